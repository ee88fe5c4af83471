use std::collections::BTreeMap;

use serde::Serialize;

use shopseed_core::{EntityKind, StoreErrorKind};

/// Lifecycle of a seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunState {
    Idle,
    ProbingReadiness,
    GeneratingPhase { index: usize, entity: EntityKind },
    Completed,
    Failed,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Completed | RunState::Failed)
    }
}

/// Summary of one executed phase.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseReport {
    pub entity: EntityKind,
    pub table: &'static str,
    pub rows_attempted: u64,
    pub rows_inserted: u64,
    pub rows_skipped: u64,
    pub duration_ms: u64,
}

/// Report for a seeding run, written whether or not the run succeeded.
#[derive(Debug, Clone, Serialize)]
pub struct SeedReport {
    pub run_id: String,
    pub seed: u64,
    pub engine: String,
    pub state: RunState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe_attempts: Option<u32>,
    pub phases: Vec<PhaseReport>,
    pub pool_sizes: BTreeMap<EntityKind, usize>,
    pub rows_inserted_total: u64,
    pub rows_skipped_total: u64,
    pub skipped_by_kind: BTreeMap<StoreErrorKind, u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_phase: Option<EntityKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl SeedReport {
    pub fn new(run_id: String, seed: u64, engine: &str) -> Self {
        Self {
            run_id,
            seed,
            engine: engine.to_string(),
            state: RunState::Idle,
            probe_attempts: None,
            phases: Vec::new(),
            pool_sizes: BTreeMap::new(),
            rows_inserted_total: 0,
            rows_skipped_total: 0,
            skipped_by_kind: BTreeMap::new(),
            failed_phase: None,
            error: None,
            duration_ms: 0,
        }
    }

    pub fn record_phase(&mut self, phase: PhaseReport) {
        self.rows_inserted_total += phase.rows_inserted;
        self.rows_skipped_total += phase.rows_skipped;
        self.phases.push(phase);
    }

    pub fn record_skip(&mut self, kind: StoreErrorKind) {
        *self.skipped_by_kind.entry(kind).or_insert(0) += 1;
    }

    pub fn phase(&self, entity: EntityKind) -> Option<&PhaseReport> {
        self.phases.iter().find(|phase| phase.entity == entity)
    }
}
