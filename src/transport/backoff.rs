use crate::config::RetryConfig;
use crate::transport::TransportError;
use std::future::Future;
use std::time::Duration;

/// Doubling delay schedule with an upper bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialBackoff {
    base_ms: u64,
    max_ms: u64,
}

impl ExponentialBackoff {
    pub const fn new(base_ms: u64, max_ms: u64) -> Self {
        Self { base_ms, max_ms }
    }

    /// Delay before retry number `retry` (0 for the first retry)
    pub fn delay(&self, retry: u32) -> Duration {
        let exponential = self
            .base_ms
            .saturating_mul(2u64.saturating_pow(retry.min(20)));
        Duration::from_millis(exponential.min(self.max_ms))
    }
}

/// Bounded retry policy applied to every transport call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: ExponentialBackoff,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: ExponentialBackoff) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_attempts,
            ExponentialBackoff::new(config.base_delay_ms, config.max_delay_ms),
        )
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Runs `op` until it succeeds, fails permanently, or attempts run out
    ///
    /// `op` receives the 1-based attempt number. Transient failures are
    /// retried after the backoff delay; once the last attempt fails the
    /// error is wrapped in `RetriesExhausted`. Permanent failures return
    /// immediately.
    ///
    /// # Arguments
    ///
    /// * `op` - One attempt, given its 1-based attempt number
    ///
    /// # Returns
    ///
    /// * `Ok(T)` - The first successful attempt
    /// * `Err(TransportError::RetriesExhausted)` - Every attempt failed transiently
    /// * `Err(TransportError)` - A permanent failure, unwrapped
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, TransportError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, TransportError>>,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;

            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.max_attempts => {
                    let delay = self.backoff.delay(attempt - 1);
                    tracing::warn!(
                        "Attempt {}/{} failed ({}), retrying in {:?}",
                        attempt,
                        self.max_attempts,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) if e.is_transient() => {
                    return Err(TransportError::RetriesExhausted {
                        attempts: attempt,
                        last: Box::new(e),
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }
}
