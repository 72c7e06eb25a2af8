//! Exponential backoff for startup operations.

use std::future::Future;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Retry schedule: the interval doubles after every failed attempt, capped
/// at `max_interval`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub max_attempts: u32,
    pub initial_interval: Duration,
    pub max_interval: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_interval: Duration::from_secs(5),
            max_interval: Duration::from_secs(60),
        }
    }
}

impl BackoffPolicy {
    /// Interval for each attempt, in order.
    pub fn intervals(&self) -> impl Iterator<Item = Duration> + '_ {
        let mut current = self.initial_interval;
        (0..self.max_attempts).map(move |_| {
            let interval = current;
            current = current.saturating_mul(2).min(self.max_interval);
            interval.min(self.max_interval)
        })
    }
}

/// Run `op` until it succeeds or the policy's attempts are exhausted.
///
/// `op` receives the 1-based attempt number and the interval for that
/// attempt, which callers use as the attempt timeout. Failures sleep for the
/// same interval before the next attempt; the last failure is returned
/// without sleeping.
pub async fn retry_with_backoff<T, F, Fut>(policy: &BackoffPolicy, mut op: F) -> AppResult<T>
where
    F: FnMut(u32, Duration) -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let mut last_error = None;

    for (index, interval) in policy.intervals().enumerate() {
        let attempt = index as u32 + 1;
        match op(attempt, interval).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                tracing::warn!(
                    attempt,
                    max_attempts = policy.max_attempts,
                    error = %e,
                    "Attempt failed"
                );
                last_error = Some(e);
                if attempt < policy.max_attempts {
                    tracing::info!("Retrying in {:?}", interval);
                    tokio::time::sleep(interval).await;
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| AppError::internal("retry policy allows no attempts")))
}
