use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::entity::EntityKind;

/// Structured reason attached to a failed store write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreErrorKind {
    UniqueViolation,
    ForeignKeyViolation,
    NotNullViolation,
    CheckViolation,
    /// A business precondition raised by the store (trigger `RAISE EXCEPTION`).
    BusinessRule,
    Connectivity,
    Other,
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StoreErrorKind::UniqueViolation => "unique violation",
            StoreErrorKind::ForeignKeyViolation => "foreign key violation",
            StoreErrorKind::NotNullViolation => "not-null violation",
            StoreErrorKind::CheckViolation => "check violation",
            StoreErrorKind::BusinessRule => "business rule",
            StoreErrorKind::Connectivity => "connectivity",
            StoreErrorKind::Other => "other",
        };
        f.write_str(label)
    }
}

/// A single insert rejected by the store.
#[derive(Debug, Clone, Error)]
#[error("{entity} insert failed ({kind}): {message}")]
pub struct StoreWriteError {
    pub entity: EntityKind,
    pub kind: StoreErrorKind,
    /// Constraint name reported by the store, when known.
    pub constraint: Option<String>,
    pub message: String,
}

impl StoreWriteError {
    pub fn new(entity: EntityKind, kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            entity,
            kind,
            constraint: None,
            message: message.into(),
        }
    }

    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = Some(constraint.into());
        self
    }
}

/// Fatal conditions that abort a seeding run.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The readiness probe exhausted its retry budget.
    #[error("store unreachable after {attempts} attempts: {last_error}")]
    StoreUnreachable { attempts: u32, last_error: String },
    /// A write failed and was not classified as tolerable.
    #[error(transparent)]
    StoreWrite(#[from] StoreWriteError),
    /// A phase asked for more distinct identifiers than a pool holds.
    #[error("insufficient {entity} population: requested {requested}, available {available}")]
    InsufficientPopulation {
        entity: EntityKind,
        requested: usize,
        available: usize,
    },
    /// A required reference was drawn from a pool nothing populated.
    #[error("{entity} pool is empty")]
    EmptyPool { entity: EntityKind },
    /// A derived field needs a parent column the ledger does not hold.
    #[error("{entity} {id} has no recorded `{column}`")]
    MissingParentField {
        entity: EntityKind,
        id: i64,
        column: &'static str,
    },
    #[error("phase dependencies contain a cycle: {0:?}")]
    CyclicDependencies(Vec<EntityKind>),
    #[error("phase {phase} depends on {prerequisite}, which is not a declared phase")]
    UnknownPrerequisite {
        phase: EntityKind,
        prerequisite: EntityKind,
    },
    #[error("phase {phase} started before {prerequisite} completed")]
    PrerequisiteIncomplete {
        phase: EntityKind,
        prerequisite: EntityKind,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Any fatal error raised while a phase was running.
    #[error("phase {phase} failed: {source}")]
    Phase {
        phase: EntityKind,
        #[source]
        source: Box<SeedError>,
    },
}

impl SeedError {
    pub fn in_phase(self, phase: EntityKind) -> Self {
        match self {
            already @ SeedError::Phase { .. } => already,
            other => SeedError::Phase {
                phase,
                source: Box::new(other),
            },
        }
    }

    /// Phase the error was raised in, if any.
    pub fn phase(&self) -> Option<EntityKind> {
        match self {
            SeedError::Phase { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}

/// Convenience alias for results returned by shopseed crates.
pub type Result<T> = std::result::Result<T, SeedError>;
