use std::future::Future;
use std::time::Duration;

use crate::services::errors::{ServiceError, is_contention};

/// Bounded retry with exponential backoff for writes that hit lock contention.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(20),
            multiplier: 2,
        }
    }
}

impl RetryPolicy {
    /// Delay before retrying after the given (0-indexed) failed attempt.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.initial_delay * self.multiplier.pow(attempt)
    }

    /// Runs `op` until it succeeds, fails with a non-contention error, or the
    /// attempts are used up. Exhaustion is reported as
    /// [`ServiceError::ConcurrencyConflict`].
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, ServiceError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, sqlx::Error>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if is_contention(&e) => {
                    attempt += 1;
                    if attempt >= self.max_attempts {
                        tracing::warn!("Giving up after {} contended attempts: {}", attempt, e);
                        return Err(ServiceError::ConcurrencyConflict);
                    }
                    let delay = self.delay_for_attempt(attempt - 1);
                    tracing::debug!("Store busy, retrying in {:?} (attempt {})", delay, attempt);
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(ServiceError::Database(e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_grows_exponentially() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(20));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(40));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(80));
    }

    #[tokio::test]
    async fn non_contention_errors_are_not_retried() {
        let policy = RetryPolicy::default();
        let mut calls = 0;
        let result: Result<(), _> = policy
            .run(|| {
                calls += 1;
                async { Err(sqlx::Error::RowNotFound) }
            })
            .await;

        assert!(matches!(result, Err(ServiceError::Database(_))));
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn success_is_returned_immediately() {
        let policy = RetryPolicy::default();
        let value = policy.run(|| async { Ok::<_, sqlx::Error>(7) }).await.unwrap();
        assert_eq!(value, 7);
    }
}
