use async_trait::async_trait;
use thiserror::Error;

use shopseed_core::{Record, RecordId, StoreWriteError};

/// The store did not answer the probe query.
#[derive(Debug, Clone, Error)]
#[error("store not ready: {0}")]
pub struct NotReady(pub String);

/// Trait implemented by stores the seeder can write into.
#[async_trait]
pub trait Store: Send + Sync {
    /// Returns the engine identifier (e.g. `postgres`).
    fn engine(&self) -> &'static str;

    /// Run a trivial no-op query.
    async fn ping(&self) -> Result<(), NotReady>;

    /// Insert one record and return its generated key, if the table has one.
    ///
    /// Never retries; every failure is reported with a structured kind.
    async fn insert(&self, record: &Record) -> Result<Option<RecordId>, StoreWriteError>;

    /// Release the session. Called exactly once at the end of a run.
    async fn close(&self);
}
