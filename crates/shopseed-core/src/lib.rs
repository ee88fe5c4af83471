//! Core contracts for shopseed.
//!
//! This crate defines the entity catalogue, the phase dependency graph, the
//! identifier pool and record ledger shared between phases, the monetary
//! aggregate rules, the junction conflict policy, and the run configuration.

pub mod aggregate;
pub mod config;
pub mod conflict;
pub mod entity;
pub mod error;
pub mod graph;
pub mod ledger;
pub mod pool;
pub mod value;

pub use aggregate::{LineAmounts, OrderAmounts, tax};
pub use config::{CountsConfig, IntRange, NullsConfig, PricingConfig, ReadinessConfig, SeedConfig};
pub use conflict::{ConflictDecision, ConflictPolicy};
pub use entity::EntityKind;
pub use error::{Result, SeedError, StoreErrorKind, StoreWriteError};
pub use graph::{PhaseGraphReport, PhaseNode, build_phase_graph_report, execution_order};
pub use ledger::RecordLedger;
pub use pool::IdentifierPool;
pub use value::{FieldValue, Money, Record, RecordId};
