//! Jittered, bounded retry for outbound HTTP calls.
//!
//! A [`RetryPolicy`] wraps a single-attempt future factory and adds:
//!
//! - a random pre-request delay drawn from `jitter_ms`
//! - a per-attempt timeout
//! - a fixed delay between attempts, up to `max_attempts` in total
//!
//! The budget is always finite. Only the weather fetcher goes through here;
//! the GIF lookup is a single timed request.

use rand::{Rng, rng};
use std::future::Future;
use std::ops::RangeInclusive;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::{sleep, timeout};
use tracing::{error, info, instrument, warn};

/// Why a single outbound attempt failed.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed response: {0}")]
    Parse(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Attempt budget, spacing and timeout for one kind of outbound call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Fixed wait between a failed attempt and the next one.
    pub retry_delay: Duration,
    /// Upper bound on a single attempt.
    pub timeout: Duration,
    /// Pre-request delay range in milliseconds, drawn once per `run`.
    pub jitter_ms: RangeInclusive<u64>,
}

impl RetryPolicy {
    /// Weather policy: 1-15 s jitter, 10 s timeout, one retry after 5 s.
    pub fn weather() -> Self {
        Self {
            max_attempts: 2,
            retry_delay: Duration::from_secs(5),
            timeout: Duration::from_secs(10),
            jitter_ms: 1_000..=15_000,
        }
    }

    /// Draw the pre-request delay for this run.
    pub fn jitter(&self) -> Duration {
        let (lo, hi) = (*self.jitter_ms.start(), *self.jitter_ms.end());
        if hi == 0 || lo > hi {
            return Duration::ZERO;
        }
        Duration::from_millis(rng().random_range(lo..=hi))
    }

    /// Run `op` under this policy, returning the first success or the last
    /// error once the attempt budget is spent.
    #[instrument(level = "debug", skip_all, fields(label = %label))]
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let jitter = self.jitter();
        if !jitter.is_zero() {
            info!(?jitter, "Delaying request");
            sleep(jitter).await;
        }

        let total_t0 = Instant::now();
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            let attempt_t0 = Instant::now();
            let result = match timeout(self.timeout, op()).await {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout(self.timeout)),
            };

            match result {
                Ok(value) => {
                    if attempt > 1 {
                        info!(attempt, "Request succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(e) if attempt >= max_attempts => {
                    error!(
                        attempt,
                        max = max_attempts,
                        elapsed_ms_total = total_t0.elapsed().as_millis(),
                        error = %e,
                        "Request exhausted attempts"
                    );
                    return Err(e);
                }
                Err(e) => {
                    warn!(
                        attempt,
                        max = max_attempts,
                        elapsed_ms_attempt = attempt_t0.elapsed().as_millis(),
                        delay = ?self.retry_delay,
                        error = %e,
                        "Request attempt failed; retrying"
                    );
                    sleep(self.retry_delay).await;
                }
            }
        }
    }
}
