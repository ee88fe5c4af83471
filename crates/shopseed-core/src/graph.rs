use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::entity::EntityKind;
use crate::error::{Result, SeedError};

/// One phase as seen by the dependency graph.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseNode {
    pub entity: EntityKind,
    /// Phases whose pools must be populated before this one runs.
    pub requires: Vec<EntityKind>,
    /// Phases this one reads if present; still ordered before it.
    pub optional: Vec<EntityKind>,
}

impl PhaseNode {
    pub fn new(entity: EntityKind, requires: &[EntityKind], optional: &[EntityKind]) -> Self {
        Self {
            entity,
            requires: requires.to_vec(),
            optional: optional.to_vec(),
        }
    }

    /// Every phase this one must run after.
    pub fn prerequisites(&self) -> impl Iterator<Item = EntityKind> + '_ {
        self.requires.iter().chain(self.optional.iter()).copied()
    }
}

/// Summary of the phase graph structure.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseGraphSummary {
    pub nodes: usize,
    pub edges: usize,
}

/// Ordering report for the `plan` command.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseGraphReport {
    pub summary: PhaseGraphSummary,
    pub order: Option<Vec<EntityKind>>,
    pub cycle: Option<Vec<EntityKind>>,
}

/// Build a report without failing on cycles.
pub fn build_phase_graph_report(nodes: &[PhaseNode]) -> PhaseGraphReport {
    let summary = PhaseGraphSummary {
        nodes: nodes.len(),
        edges: nodes.iter().map(|node| node.prerequisites().count()).sum(),
    };

    match execution_order(nodes) {
        Ok(order) => PhaseGraphReport {
            summary,
            order: Some(order),
            cycle: None,
        },
        Err(SeedError::CyclicDependencies(cycle)) => PhaseGraphReport {
            summary,
            order: None,
            cycle: Some(cycle),
        },
        Err(_) => PhaseGraphReport {
            summary,
            order: None,
            cycle: None,
        },
    }
}

/// Derive the execution order of phases.
///
/// Kahn's algorithm; among phases that are ready at the same time the one
/// declared first runs first, so independent phases keep table order.
pub fn execution_order(nodes: &[PhaseNode]) -> Result<Vec<EntityKind>> {
    let index: BTreeMap<EntityKind, usize> = nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| (node.entity, idx))
        .collect();

    let mut dependents: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); nodes.len()];
    let mut indegree = vec![0_usize; nodes.len()];

    for (idx, node) in nodes.iter().enumerate() {
        let prerequisites: BTreeSet<EntityKind> = node.prerequisites().collect();
        for prerequisite in prerequisites {
            let parent = *index
                .get(&prerequisite)
                .ok_or(SeedError::UnknownPrerequisite {
                    phase: node.entity,
                    prerequisite,
                })?;
            dependents[parent].insert(idx);
            indegree[idx] += 1;
        }
    }

    let mut ready: BTreeSet<usize> = indegree
        .iter()
        .enumerate()
        .filter_map(|(idx, count)| if *count == 0 { Some(idx) } else { None })
        .collect();

    let mut order = Vec::with_capacity(nodes.len());

    while let Some(idx) = ready.pop_first() {
        order.push(nodes[idx].entity);

        for &child in &dependents[idx] {
            indegree[child] = indegree[child].saturating_sub(1);
            if indegree[child] == 0 {
                ready.insert(child);
            }
        }
    }

    if order.len() == nodes.len() {
        Ok(order)
    } else {
        let cycle_nodes = indegree
            .into_iter()
            .enumerate()
            .filter_map(|(idx, count)| if count > 0 { Some(nodes[idx].entity) } else { None })
            .collect();
        Err(SeedError::CyclicDependencies(cycle_nodes))
    }
}
