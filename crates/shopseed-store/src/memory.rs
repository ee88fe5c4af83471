use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use shopseed_core::{EntityKind, FieldValue, Record, RecordId, StoreErrorKind, StoreWriteError};

use crate::adapter::{NotReady, Store};

/// Business precondition checked before a row is accepted.
///
/// Returns a message when the row must be rejected.
pub type MemoryRule = Box<dyn Fn(&Record, &MemoryView<'_>) -> Option<String> + Send + Sync>;

/// Read access to rows already stored, for rules.
pub struct MemoryView<'a> {
    state: &'a State,
}

impl MemoryView<'_> {
    pub fn row(&self, entity: EntityKind, id: RecordId) -> Option<&Record> {
        self.state
            .rows
            .get(&entity)?
            .iter()
            .find(|(row_id, _)| *row_id == Some(id))
            .map(|(_, record)| record)
    }
}

#[derive(Default)]
struct State {
    rows: BTreeMap<EntityKind, Vec<(Option<RecordId>, Record)>>,
    next_id: BTreeMap<EntityKind, RecordId>,
    pairs: HashSet<(EntityKind, i64, i64)>,
    pings: u32,
    failing_pings: u32,
    close_calls: u32,
}

/// In-process store with serial keys and pair uniqueness.
///
/// Used for dry runs and for exercising the engine without a database.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    rules: Vec<(EntityKind, MemoryRule)>,
    failures: BTreeMap<EntityKind, StoreErrorKind>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the first `count` probe queries.
    pub fn with_failing_pings(self, count: u32) -> Self {
        self.lock().failing_pings = count;
        self
    }

    /// Reject rows of `entity` that break `rule` with a business-rule failure.
    pub fn with_rule(
        mut self,
        entity: EntityKind,
        rule: impl Fn(&Record, &MemoryView<'_>) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.rules.push((entity, Box::new(rule)));
        self
    }

    /// The rules the Postgres schema enforces with triggers.
    pub fn with_storefront_rules(self) -> Self {
        self.with_rule(EntityKind::OrderCoupon, coupon_minimum_met)
    }

    /// Fail every insert into `entity` with `kind`.
    pub fn with_failure(mut self, entity: EntityKind, kind: StoreErrorKind) -> Self {
        self.failures.insert(entity, kind);
        self
    }

    pub fn count(&self, entity: EntityKind) -> usize {
        self.lock().rows.get(&entity).map(Vec::len).unwrap_or(0)
    }

    /// Stored rows of `entity`, in insertion order.
    pub fn rows(&self, entity: EntityKind) -> Vec<Record> {
        self.lock()
            .rows
            .get(&entity)
            .map(|rows| rows.iter().map(|(_, record)| record.clone()).collect())
            .unwrap_or_default()
    }

    pub fn ping_count(&self) -> u32 {
        self.lock().pings
    }

    pub fn close_count(&self) -> u32 {
        self.lock().close_calls
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panic while holding the lock leaves the state usable; keep going.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Rejects an order coupon whose order subtotal is below the coupon's
/// minimum purchase.
pub fn coupon_minimum_met(record: &Record, view: &MemoryView<'_>) -> Option<String> {
    let order = view.row(EntityKind::Order, record.get("order_id")?.as_i64()?)?;
    let coupon = view.row(EntityKind::Coupon, record.get("coupon_id")?.as_i64()?)?;
    let subtotal = order.get("subtotal")?.as_money()?;
    let minimum = coupon.get("minimum_purchase")?.as_money()?;
    (subtotal < minimum)
        .then(|| format!("order subtotal {subtotal} is below minimum purchase {minimum}"))
}

fn pair_of(record: &Record) -> Option<(i64, i64)> {
    let (left, right) = record.entity.pair_key()?;
    let left = record.get(left).and_then(FieldValue::as_i64)?;
    let right = record.get(right).and_then(FieldValue::as_i64)?;
    Some((left, right))
}

#[async_trait]
impl Store for MemoryStore {
    fn engine(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), NotReady> {
        let mut state = self.lock();
        state.pings += 1;
        if state.close_calls > 0 {
            return Err(NotReady("store closed".to_string()));
        }
        if state.pings <= state.failing_pings {
            return Err(NotReady(format!("connection refused (attempt {})", state.pings)));
        }
        Ok(())
    }

    async fn insert(&self, record: &Record) -> Result<Option<RecordId>, StoreWriteError> {
        let entity = record.entity;
        let mut state = self.lock();

        if state.close_calls > 0 {
            return Err(StoreWriteError::new(
                entity,
                StoreErrorKind::Connectivity,
                "store closed",
            ));
        }

        if let Some(kind) = self.failures.get(&entity) {
            return Err(StoreWriteError::new(entity, *kind, "injected failure"));
        }

        for (rule_entity, rule) in &self.rules {
            if *rule_entity != entity {
                continue;
            }
            let view = MemoryView { state: &*state };
            if let Some(message) = rule(record, &view) {
                return Err(StoreWriteError::new(
                    entity,
                    StoreErrorKind::BusinessRule,
                    message,
                ));
            }
        }

        if let Some((left, right)) = pair_of(record) {
            if !state.pairs.insert((entity, left, right)) {
                let constraint = format!("{}_pkey", entity.table());
                return Err(StoreWriteError::new(
                    entity,
                    StoreErrorKind::UniqueViolation,
                    format!("duplicate key ({left}, {right})"),
                )
                .with_constraint(constraint));
            }
        }

        let id = if entity.key_column().is_some() {
            let next = state.next_id.entry(entity).or_insert(0);
            *next += 1;
            Some(*next)
        } else {
            None
        };

        state
            .rows
            .entry(entity)
            .or_default()
            .push((id, record.clone()));
        Ok(id)
    }

    async fn close(&self) {
        self.lock().close_calls += 1;
    }
}
