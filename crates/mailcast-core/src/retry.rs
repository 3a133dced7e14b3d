//! Retry supervision for fallible I/O against the IMAP server and broker

use mailcast_common::Result;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Fixed-delay retry policy.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Wait between attempts
    pub delay: Duration,
    /// Number of guarded retries before the final bare attempt
    pub retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(1),
            retries: 10,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the given delay and retry count
    pub fn new(delay: Duration, retries: u32) -> Self {
        Self { delay, retries }
    }
}

/// Re-invoke `op` on transient failures, up to `policy.retries` guarded
/// attempts, then make one final unguarded attempt whose outcome
/// propagates as-is. Total attempts for an always-failing transient
/// operation: `retries + 1`.
///
/// Non-transient errors propagate immediately without consuming a retry.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, label: &str, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    for attempt in 0..policy.retries {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() => {
                warn!(
                    "Retry exception thrown when attempting to run {}, attempt {} of {}: {}",
                    label, attempt, policy.retries, e
                );
                tokio::time::sleep(policy.delay).await;
            }
            Err(e) => return Err(e),
        }
    }

    // Last attempt runs bare: its error is never caught here.
    op().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailcast_common::Error;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_always_failing_runs_retries_plus_one() {
        let policy = RetryPolicy::new(Duration::from_millis(10), 3);
        let attempts = AtomicU32::new(0);

        let result: Result<()> = with_retry(&policy, "always-fails", || {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            async move { Err(Error::Transient(format!("attempt {}", n))) }
        })
        .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 4);
        // The surfaced error is the final attempt's own.
        match result {
            Err(Error::Transient(msg)) => assert_eq!(msg, "attempt 3"),
            other => panic!("unexpected result: {:?}", other.err()),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_transient_failures() {
        let policy = RetryPolicy::new(Duration::from_millis(10), 5);
        let attempts = AtomicU32::new(0);

        let result = with_retry(&policy, "flaky", || {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(Error::Transient("not yet".to_string()))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_transient_fails_immediately() {
        let policy = RetryPolicy::new(Duration::from_millis(10), 5);
        let attempts = AtomicU32::new(0);

        let result: Result<()> = with_retry(&policy, "fatal", || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::Auth("login rejected".to_string())) }
        })
        .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(Error::Auth(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_still_attempts_once() {
        let policy = RetryPolicy::new(Duration::from_millis(10), 0);
        let attempts = AtomicU32::new(0);

        let result: Result<()> = with_retry(&policy, "single", || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::Transient("boom".to_string())) }
        })
        .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert!(result.is_err());
    }
}
