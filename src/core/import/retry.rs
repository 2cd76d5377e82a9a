//! Retry with exponential backoff for transient store failures

use crate::config::RetryConfig;
use crate::domain::Result;
use crate::log_retry_attempt;
use std::future::Future;
use std::time::Duration;

/// Backoff parameters
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: usize,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
    /// Factor applied to the delay after each retry
    pub multiplier: f64,
}

impl RetryPolicy {
    /// Never retry
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            multiplier: 1.0,
        }
    }

    /// Delay before retry number `retry` (1-based)
    pub fn delay_for(&self, retry: usize) -> Duration {
        let exponent = retry.saturating_sub(1).min(32) as i32;
        let scaled = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);
        Duration::from_secs_f64(scaled.min(self.max_delay.as_secs_f64()))
    }

    /// Run `operation` until it succeeds, fails permanently, or retries run out
    ///
    /// Returns the final result together with the number of attempts made.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> (Result<T>, usize)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match operation().await {
                Ok(value) => return (Ok(value), attempts),
                Err(e) if e.is_transient() && attempts <= self.max_retries => {
                    let delay = self.delay_for(attempts);
                    log_retry_attempt!(attempts, self.max_retries + 1, e);
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return (Err(e), attempts),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            multiplier: config.backoff_multiplier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CosmosCsvError, StoreError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast(max_retries: usize) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
            multiplier: 2.0,
        }
    }

    #[test]
    fn test_delay_growth_is_capped() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for(3), Duration::from_secs(4));
        assert_eq!(policy.delay_for(20), Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_transient_then_success() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let (result, attempts) = fast(3)
            .run(move || async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(StoreError::Throttled("busy".into()).into())
                } else {
                    Ok(7)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(attempts, 3);
    }

    #[tokio::test]
    async fn test_permanent_error_is_not_retried() {
        let (result, attempts) = fast(3)
            .run(|| async { Err::<(), _>(CosmosCsvError::Validation("bad".into())) })
            .await;

        assert!(result.is_err());
        assert_eq!(attempts, 1);
    }

    #[tokio::test]
    async fn test_retries_exhausted() {
        let (result, attempts) = fast(2)
            .run(|| async { Err::<(), _>(StoreError::Timeout("slow".into()).into()) })
            .await;

        assert!(result.unwrap_err().is_transient());
        assert_eq!(attempts, 3);
    }

    #[tokio::test]
    async fn test_no_retry_policy() {
        let (_, attempts) = RetryPolicy::none()
            .run(|| async { Err::<(), _>(StoreError::Throttled("busy".into()).into()) })
            .await;
        assert_eq!(attempts, 1);
    }
}
