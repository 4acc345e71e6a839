//! Retry with exponential backoff.
//!
//! [`RetryPolicy::run`] wraps any fallible async operation. The policy is
//! coarse: every [`Error::Upstream`](crate::Error::Upstream) is
//! retried, whether it came from a transport failure or from a non-2xx status
//! (4xx included), until the attempt budget is spent. Errors of any other kind
//! are returned at once.

use async_trait::async_trait;
use std::future::Future;
use tokio::time::Duration;
use tracing::{error, warn};

/// Attempt budget and backoff curve.
///
/// The wait after the n-th failed attempt (1-based) is
/// `min(max_delay, max(min_delay, multiplier * 2^(n-1)))` time units.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, first one included.
    pub max_attempts: u32,
    pub multiplier: f64,
    pub min_delay: f64,
    pub max_delay: f64,
    /// Length of one time unit.
    pub unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            multiplier: 1.0,
            min_delay: 4.0,
            max_delay: 10.0,
            unit: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single attempt, no retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn with_bounds(mut self, min_delay: f64, max_delay: f64) -> Self {
        self.min_delay = min_delay;
        self.max_delay = max_delay;
        self
    }

    pub fn with_unit(mut self, unit: Duration) -> Self {
        self.unit = unit;
        self
    }

    /// Wait after the `attempt`-th failure (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(63) as i32;
        let raw = self.multiplier * 2f64.powi(exp);
        let units = raw.max(self.min_delay).min(self.max_delay).max(0.0);
        self.unit.mul_f64(units)
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt budget is spent. `op` receives the 1-based attempt number.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut op: F) -> crate::Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = crate::Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) => match self.should_retry(attempt, &err).await {
                    Some(delay) => {
                        warn!(
                            operation,
                            attempt,
                            max_attempts = self.max_attempts,
                            delay_ms = delay.as_millis() as u64,
                            error = %err,
                            "attempt failed, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    None => {
                        if err.is_retryable() {
                            error!(operation, attempts = attempt, error = %err, "giving up");
                        }
                        return Err(err);
                    }
                },
            }
        }
    }
}

/// Decides whether, and after how long, a failed attempt is repeated.
#[async_trait]
pub trait ResiliencePolicy: Send + Sync {
    async fn should_retry(&self, attempt: u32, error: &crate::Error) -> Option<Duration>;
}

#[async_trait]
impl ResiliencePolicy for RetryPolicy {
    async fn should_retry(&self, attempt: u32, error: &crate::Error) -> Option<Duration> {
        if attempt >= self.max_attempts || !error.is_retryable() {
            return None;
        }
        Some(self.backoff(attempt))
    }
}
