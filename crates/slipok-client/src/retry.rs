//! Retry loop and backoff timing for verification requests.

use std::time::Duration;

use crate::RETRY_TARGET;
use crate::error::Result;

/// Retry behavior for failed verification requests.
///
/// A request is attempted once, then re-attempted up to `max_retries` more
/// times while the failure stays retryable (HTTP 429 or 5xx). Between
/// attempts the loop sleeps for an exponentially growing backoff:
/// `initial_backoff * multiplier^attempt`, i.e. 500 ms, 1 s, 2 s, ... with
/// the defaults.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts (0 means a single attempt, no retries)
    pub max_retries: u32,
    /// Backoff before the first retry
    pub initial_backoff: Duration,
    /// Backoff multiplier for exponential backoff
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff: Duration::from_millis(500),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Create a new retry policy.
    pub fn new(max_retries: u32, initial_backoff: Duration) -> Self {
        Self {
            max_retries,
            initial_backoff,
            backoff_multiplier: 2.0,
        }
    }

    /// Create a policy that never retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            initial_backoff: Duration::ZERO,
            backoff_multiplier: 1.0,
        }
    }

    /// Calculate the backoff duration for a given attempt number.
    ///
    /// Attempt numbers are zero-based: the wait after the first failed
    /// attempt is `backoff_for(0)`.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let backoff_millis =
            (self.initial_backoff.as_millis() as f64) * self.backoff_multiplier.powi(attempt as i32);
        Duration::from_millis(backoff_millis as u64)
    }

    /// Run an async operation according to this policy.
    ///
    /// The operation is invoked once per attempt. A non-retryable failure,
    /// or a retryable failure on the final attempt, is returned unchanged so
    /// the caller sees the last captured status, endpoint, and body.
    pub async fn run<F, Fut, T>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        tracing::debug!(
                            target: RETRY_TARGET,
                            attempt = attempt + 1,
                            "Request succeeded after retry"
                        );
                    }
                    return Ok(value);
                }
                Err(err) => {
                    if !err.is_retryable() || attempt == self.max_retries {
                        tracing::debug!(
                            target: RETRY_TARGET,
                            attempt = attempt + 1,
                            retryable = err.is_retryable(),
                            error = %err,
                            "Request failed permanently"
                        );
                        return Err(err);
                    }

                    let backoff = self.backoff_for(attempt);
                    tracing::warn!(
                        target: RETRY_TARGET,
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        backoff_ms = backoff.as_millis(),
                        error = %err,
                        "Request failed, retrying after backoff"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
            }
        }
    }
}
