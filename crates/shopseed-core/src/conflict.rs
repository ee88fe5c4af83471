use serde::Serialize;

use crate::entity::EntityKind;
use crate::error::{StoreErrorKind, StoreWriteError};

/// What to do with a failed insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictDecision {
    /// Expected conflict: skip the row and keep going.
    Skip,
    /// Re-raise and abort the run.
    Abort,
}

/// Per-relation set of tolerable failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConflictPolicy {
    entity: EntityKind,
    tolerable: &'static [StoreErrorKind],
}

const NONE: &[StoreErrorKind] = &[];
const DUPLICATE_PAIR: &[StoreErrorKind] = &[StoreErrorKind::UniqueViolation];
const DUPLICATE_OR_RULE: &[StoreErrorKind] =
    &[StoreErrorKind::UniqueViolation, StoreErrorKind::BusinessRule];

impl ConflictPolicy {
    pub fn for_entity(entity: EntityKind) -> Self {
        let tolerable = match entity {
            EntityKind::OrderCoupon => DUPLICATE_OR_RULE,
            EntityKind::WishlistProduct
            | EntityKind::WarehouseProduct
            | EntityKind::CartItem
            | EntityKind::CustomerCoupon
            | EntityKind::ProductRelated => DUPLICATE_PAIR,
            _ => NONE,
        };
        Self { entity, tolerable }
    }

    pub fn entity(&self) -> EntityKind {
        self.entity
    }

    pub fn tolerable(&self) -> &'static [StoreErrorKind] {
        self.tolerable
    }

    /// Whether any failure of this relation can be skipped.
    pub fn tolerates_conflicts(&self) -> bool {
        !self.tolerable.is_empty()
    }

    /// Classify a failure by its structured kind; messages are never inspected.
    pub fn classify(&self, error: &StoreWriteError) -> ConflictDecision {
        if error.entity == self.entity && self.tolerable.contains(&error.kind) {
            ConflictDecision::Skip
        } else {
            ConflictDecision::Abort
        }
    }
}
