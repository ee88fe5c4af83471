//! Seeding engine for shopseed.
//!
//! Runs the storefront phase table in dependency order against a `Store`,
//! drawing field values from a `FakeValueProvider` and references from the
//! identifier pool.

pub mod engine;
pub mod faker;
pub mod model;
pub mod phases;
pub mod provider;

pub use engine::{SeedFailure, SeedOutcome, Seeder};
pub use faker::FakeRsProvider;
pub use model::{PhaseReport, RunState, SeedReport};
pub use phases::{PhaseContext, PhaseDef, PhaseFn, phase_table};
pub use provider::{FakeValueProvider, TextKind};
