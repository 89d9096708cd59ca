//! Retry loop for optimistic-concurrency conflicts (Imperative Shell).

use std::future::Future;

use tablekit_core::retry::RetryPolicy;
use tablekit_core::storage::{PrimaryKey, RepositoryError, Result};

/// Runs `attempt_fn` until it succeeds, fails with anything other than a
/// conditional-check failure, or the policy's attempts are used up.
///
/// `attempt_fn` receives the 0-based attempt number and must redo the whole
/// read-modify-write cycle. A policy allowing zero attempts still runs once.
pub(crate) async fn retry_on_conflict<T, F, Fut>(
    policy: &RetryPolicy,
    entity_type: &'static str,
    key: &PrimaryKey,
    mut attempt_fn: F,
) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match attempt_fn(attempt).await {
            Ok(value) => {
                if attempt > 0 {
                    tracing::debug!(entity_type, %key, attempts = attempt + 1, "Update converged");
                }
                return Ok(value);
            }
            Err(err) if err.is_conditional_check_failure() => {
                if !policy.should_retry(attempt) {
                    tracing::warn!(
                        entity_type,
                        %key,
                        attempts = attempt + 1,
                        "Giving up after repeated version conflicts"
                    );
                    return Err(RepositoryError::RetryAttemptsExhausted {
                        entity_type,
                        key: key.to_string(),
                        attempts: attempt + 1,
                    });
                }

                let delay = policy.delay_for(attempt);
                tracing::debug!(
                    entity_type,
                    %key,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Version conflict, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tablekit_core::storage::StoreError;

    fn conflict() -> RepositoryError {
        RepositoryError::Store(StoreError::ConditionalCheckFailed)
    }

    #[tokio::test]
    async fn test_succeeds_after_conflicts() {
        let calls = AtomicU32::new(0);
        let key = PrimaryKey::new("A", "B");

        let result = retry_on_conflict(&RetryPolicy::immediate(5), "Thing", &key, |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 2 {
                    Err(conflict())
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

        assert_eq!(result, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausts_after_exactly_max_attempts() {
        let calls = AtomicU32::new(0);
        let key = PrimaryKey::new("A", "B");

        let result: Result<()> =
            retry_on_conflict(&RetryPolicy::immediate(4), "Thing", &key, |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(conflict()) }
            })
            .await;

        assert_eq!(
            result,
            Err(RepositoryError::RetryAttemptsExhausted {
                entity_type: "Thing",
                key: "A/B".to_string(),
                attempts: 4,
            })
        );
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_other_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let key = PrimaryKey::new("A", "B");

        let result: Result<()> =
            retry_on_conflict(&RetryPolicy::immediate(4), "Thing", &key, |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(RepositoryError::Store(StoreError::Throttled("slow".into()))) }
            })
            .await;

        assert_eq!(
            result,
            Err(RepositoryError::Store(StoreError::Throttled("slow".into())))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_runs_once() {
        let calls = AtomicU32::new(0);
        let key = PrimaryKey::new("A", "B");

        let result: Result<()> =
            retry_on_conflict(&RetryPolicy::immediate(0), "Thing", &key, |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(conflict()) }
            })
            .await;

        assert!(matches!(
            result,
            Err(RepositoryError::RetryAttemptsExhausted { attempts: 1, .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
