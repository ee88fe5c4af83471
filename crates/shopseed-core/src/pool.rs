use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::index;

use crate::entity::EntityKind;
use crate::error::{Result, SeedError};
use crate::value::RecordId;

/// Identifiers produced so far, per entity type.
///
/// Append-only for the lifetime of a run: ids are never removed or
/// rewritten once added. Selection is uniform over the contents at call
/// time.
#[derive(Debug, Default, Clone)]
pub struct IdentifierPool {
    ids: BTreeMap<EntityKind, Vec<RecordId>>,
}

impl IdentifierPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entity: EntityKind, id: RecordId) {
        self.ids.entry(entity).or_default().push(id);
    }

    pub fn len(&self, entity: EntityKind) -> usize {
        self.ids.get(&entity).map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self, entity: EntityKind) -> bool {
        self.len(entity) == 0
    }

    /// Ids of `entity` in insertion order.
    pub fn ids(&self, entity: EntityKind) -> &[RecordId] {
        self.ids.get(&entity).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, entity: EntityKind, id: RecordId) -> bool {
        self.ids(entity).contains(&id)
    }

    /// Pick one id; an empty pool is a dependency-ordering bug.
    pub fn pick_one<R: Rng + ?Sized>(&self, entity: EntityKind, rng: &mut R) -> Result<RecordId> {
        let ids = self.ids(entity);
        if ids.is_empty() {
            return Err(SeedError::EmptyPool { entity });
        }
        Ok(ids[rng.random_range(0..ids.len())])
    }

    /// Pick `k` distinct ids, in random order.
    pub fn pick_distinct<R: Rng + ?Sized>(
        &self,
        entity: EntityKind,
        k: usize,
        rng: &mut R,
    ) -> Result<Vec<RecordId>> {
        let ids = self.ids(entity);
        if k > ids.len() {
            return Err(SeedError::InsufficientPopulation {
                entity,
                requested: k,
                available: ids.len(),
            });
        }
        Ok(index::sample(rng, ids.len(), k)
            .into_iter()
            .map(|idx| ids[idx])
            .collect())
    }

    /// Pick one id, or `None` with `null_probability` or when the pool is empty.
    pub fn pick_one_or_null<R: Rng + ?Sized>(
        &self,
        entity: EntityKind,
        null_probability: f64,
        rng: &mut R,
    ) -> Option<RecordId> {
        if self.is_empty(entity) || rng.random_bool(null_probability.clamp(0.0, 1.0)) {
            return None;
        }
        self.pick_one(entity, rng).ok()
    }

    /// Pool sizes for every populated entity.
    pub fn sizes(&self) -> BTreeMap<EntityKind, usize> {
        self.ids
            .iter()
            .map(|(entity, ids)| (*entity, ids.len()))
            .collect()
    }
}
