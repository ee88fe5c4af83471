use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::Row;
use tracing::debug;

use shopseed_core::{Record, RecordId, StoreWriteError};

use crate::adapter::{NotReady, Store};

mod errors;
mod statement;

pub use errors::{classify, kind_from_sqlstate};
pub use statement::{insert_sql, quote_ident};

/// PostgreSQL store backed by a single-connection pool.
///
/// The pool is created lazily, so the first real connect happens inside the
/// readiness probe rather than at construction time.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a store using a pre-configured pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a lazily connecting store.
    ///
    /// `acquire_timeout` bounds each readiness probe attempt.
    pub fn connect_lazy(options: PgConnectOptions, acquire_timeout: Duration) -> Self {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(acquire_timeout)
            .connect_lazy_with(options);
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    fn engine(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), NotReady> {
        sqlx::query("select 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|err| NotReady(err.to_string()))
    }

    async fn insert(&self, record: &Record) -> Result<Option<RecordId>, StoreWriteError> {
        let sql = insert_sql(record);
        let query = statement::bind_values(sqlx::query(&sql), record);

        if record.entity.key_column().is_some() {
            let row = query
                .fetch_one(&self.pool)
                .await
                .map_err(|err| classify(record.entity, err))?;
            let id: i64 = row
                .try_get(0)
                .map_err(|err| classify(record.entity, err))?;
            debug!(entity = %record.entity, id, "row inserted");
            Ok(Some(id))
        } else {
            query
                .execute(&self.pool)
                .await
                .map_err(|err| classify(record.entity, err))?;
            debug!(entity = %record.entity, "row inserted");
            Ok(None)
        }
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
