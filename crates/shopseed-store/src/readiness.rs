use std::time::Duration;

use tracing::{info, warn};

use shopseed_core::{ReadinessConfig, SeedError};

use crate::adapter::Store;

/// Retry budget for the readiness probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl From<&ReadinessConfig> for RetryPolicy {
    fn from(config: &ReadinessConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            delay: config.delay(),
        }
    }
}

/// Poll `store` until it answers, sleeping `delay` between failed attempts.
///
/// Returns the attempt number that succeeded. After `max_attempts`
/// consecutive failures the run is over: no sleep follows the last one.
pub async fn wait_until_ready<S>(store: &S, policy: RetryPolicy) -> Result<u32, SeedError>
where
    S: Store + ?Sized,
{
    let mut last_error = String::from("no probe attempted");

    for attempt in 1..=policy.max_attempts {
        match store.ping().await {
            Ok(()) => {
                info!(engine = store.engine(), attempt, "store ready");
                return Ok(attempt);
            }
            Err(err) => {
                warn!(
                    engine = store.engine(),
                    attempt,
                    max_attempts = policy.max_attempts,
                    error = %err,
                    "store not ready"
                );
                last_error = err.0;
                if attempt < policy.max_attempts {
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }

    Err(SeedError::StoreUnreachable {
        attempts: policy.max_attempts,
        last_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    #[tokio::test]
    async fn ready_store_answers_first_time() {
        let store = MemoryStore::new();
        let policy = RetryPolicy {
            max_attempts: 3,
            delay: Duration::from_millis(10),
        };
        assert_eq!(wait_until_ready(&store, policy).await.unwrap(), 1);
        assert_eq!(store.ping_count(), 1);
    }

    #[tokio::test]
    async fn zero_attempts_is_unreachable() {
        let store = MemoryStore::new();
        let policy = RetryPolicy {
            max_attempts: 0,
            delay: Duration::ZERO,
        };
        let err = wait_until_ready(&store, policy).await.unwrap_err();
        assert!(matches!(err, SeedError::StoreUnreachable { attempts: 0, .. }));
        assert_eq!(store.ping_count(), 0);
    }
}
