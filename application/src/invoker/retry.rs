//! Retry with exponential backoff around a fallible model call.

use super::InvokeError;
use crate::ports::llm_gateway::GatewayError;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Retry everything
pub fn retry_all(_error: &GatewayError) -> bool {
    true
}

/// Retry policy for model calls
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Errors for which another attempt is made
    pub retryable: fn(&GatewayError) -> bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            retryable: retry_all,
        }
    }
}

impl RetryPolicy {
    pub fn with_max_attempts(mut self, max: u32) -> Self {
        self.max_attempts = max;
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_retryable(mut self, retryable: fn(&GatewayError) -> bool) -> Self {
        self.retryable = retryable;
        self
    }

    /// Delay before retry `n` (1-based): `min(base * 2^(n-1), max)`
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Run `op` until it succeeds, the policy gives up, or an error is not
/// retryable.
///
/// `op` receives the 1-based attempt number.
pub async fn retry_with_backoff<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, InvokeError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, GatewayError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        let error = match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if !(policy.retryable)(&error) {
            return Err(InvokeError::Rejected(error));
        }

        if attempt >= max_attempts {
            return Err(InvokeError::Exhausted {
                attempts: attempt,
                source: error,
            });
        }

        let delay = policy.delay_for(attempt);
        warn!(
            attempt,
            max_attempts,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "Model call failed, retrying"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    #[test]
    fn test_delay_schedule() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for(3), Duration::from_secs(4));
        assert_eq!(policy.delay_for(7), Duration::from_secs(60));
        assert_eq!(policy.delay_for(100), Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_failures_with_backoff() {
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let result = retry_with_backoff(&RetryPolicy::default(), |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 3 {
                    Err(GatewayError::Connection("reset".to_string()))
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // 1s after the first failure, 2s after the second
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(3), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(3100), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_keeps_last_error() {
        let attempts = Mutex::new(Vec::new());
        let result: Result<(), _> = retry_with_backoff(&RetryPolicy::default(), |attempt| {
            attempts.lock().unwrap().push(attempt);
            async move {
                Err(GatewayError::RequestFailed {
                    status: 500,
                    message: format!("attempt {attempt}"),
                })
            }
        })
        .await;

        assert_eq!(*attempts.lock().unwrap(), vec![1, 2, 3]);
        match result {
            Err(InvokeError::Exhausted { attempts, source }) => {
                assert_eq!(attempts, 3);
                assert!(source.to_string().contains("attempt 3"));
            }
            other => panic!("expected Exhausted, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_error_rejected_immediately() {
        let policy = RetryPolicy::default()
            .with_retryable(|e| !matches!(e, GatewayError::RequestFailed { status: 400, .. }));
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = retry_with_backoff(&policy, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(GatewayError::RequestFailed {
                    status: 400,
                    message: "bad request".to_string(),
                })
            }
        })
        .await;

        assert!(matches!(result, Err(InvokeError::Rejected(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_capped_by_max() {
        let policy = RetryPolicy::default()
            .with_max_attempts(4)
            .with_base_delay(Duration::from_secs(10))
            .with_max_delay(Duration::from_secs(15));
        let start = Instant::now();

        let result: Result<(), _> =
            retry_with_backoff(&policy, |_| async { Err(GatewayError::EmptyResponse) }).await;

        assert!(matches!(result, Err(InvokeError::Exhausted { attempts: 4, .. })));
        // 10 + 15 + 15
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(40), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(40_100), "{elapsed:?}");
    }
}
