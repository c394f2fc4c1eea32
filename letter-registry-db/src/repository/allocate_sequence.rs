use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

use crate::models::letter::SequenceKey;
use crate::repository::error::RepositoryError;

/// Hands out running numbers per composite key.
///
/// For a fixed key, concurrent callers receive a strictly increasing sequence
/// starting at 1 and every value goes to exactly one caller. The
/// read-increment-write is a single atomic step in the store; a number that
/// was returned is consumed even if the caller later fails to persist it.
#[async_trait]
pub trait AllocateSequence: Send + Sync {
    async fn allocate_next(&self, key: &SequenceKey) -> Result<i32, RepositoryError>;

    /// Highest number issued so far for `key`, 0 when none.
    async fn last_issued(&self, key: &SequenceKey) -> Result<i32, RepositoryError>;
}

/// Bounded retry applied inside an allocator when the store reports a
/// transient failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationRetryPolicy {
    pub max_attempts: u32,
    pub base_backoff_ms: u64,
}

impl Default for AllocationRetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff_ms: 25,
        }
    }
}

impl AllocationRetryPolicy {
    /// Exponential backoff with up to one base interval of jitter.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponential = self
            .base_backoff_ms
            .saturating_mul(1u64 << attempt.saturating_sub(1).min(16));
        let jitter = if self.base_backoff_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=self.base_backoff_ms)
        };
        Duration::from_millis(exponential.saturating_add(jitter))
    }
}

/// Runs `op` until it succeeds, fails with a non-transient error, or the
/// policy's attempts are exhausted.
pub async fn retry_transient<T, F, Fut>(
    policy: &AllocationRetryPolicy,
    key: &SequenceKey,
    mut op: F,
) -> Result<T, RepositoryError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RepositoryError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Err(error) if error.is_transient() && attempt < max_attempts => {
                let delay = policy.backoff(attempt);
                tracing::warn!(%key, attempt, ?delay, %error, "sequence allocation hit a transient failure, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            result => return result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::String as HeaplessString;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn key() -> SequenceKey {
        SequenceKey {
            entity_code: HeaplessString::try_from("TS").unwrap(),
            category_code: HeaplessString::try_from("FIN").unwrap(),
            year: 2025,
            month: 11,
        }
    }

    fn fast_policy() -> AllocationRetryPolicy {
        AllocationRetryPolicy {
            max_attempts: 3,
            base_backoff_ms: 0,
        }
    }

    #[tokio::test]
    async fn test_retry_recovers_from_transient_failures() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result = retry_transient(&fast_policy(), &key(), move || async move {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(RepositoryError::Transient("lock timeout".into()))
            } else {
                Ok(7)
            }
        })
        .await;

        assert_eq!(result.ok(), Some(7));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_is_bounded() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<i32, _> = retry_transient(&fast_policy(), &key(), move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(RepositoryError::Transient("connection reset".into()))
        })
        .await;

        assert!(matches!(result, Err(RepositoryError::Transient(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_errors_are_not_retried() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<i32, _> = retry_transient(&fast_policy(), &key(), move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(RepositoryError::Invalid("bad key".into()))
        })
        .await;

        assert!(matches!(result, Err(RepositoryError::Invalid(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_backoff_grows() {
        let policy = AllocationRetryPolicy {
            max_attempts: 5,
            base_backoff_ms: 10,
        };
        assert!(policy.backoff(1) <= Duration::from_millis(20));
        assert!(policy.backoff(3) >= Duration::from_millis(40));
    }
}
