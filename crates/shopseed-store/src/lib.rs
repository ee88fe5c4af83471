//! Store adapters for shopseed.
//!
//! Defines the `Store` seam the engine writes through, a PostgreSQL
//! implementation on `sqlx`, an in-memory implementation for dry runs, and
//! the readiness probe run before any phase.

pub mod adapter;
pub mod memory;
pub mod postgres;
pub mod readiness;

pub use adapter::{NotReady, Store};
pub use memory::{MemoryRule, MemoryStore, MemoryView, coupon_minimum_met};
pub use postgres::PgStore;
pub use readiness::{RetryPolicy, wait_until_ready};
