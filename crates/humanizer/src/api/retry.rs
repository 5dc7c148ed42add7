//! Bounded retry with optional exponential backoff, jitter and a per-attempt
//! deadline.
//!
//! Two policies are provided:
//!
//! - [`RetryConfig::default()`]: three attempts, exponential backoff with
//!   jitter, a 60 s deadline per attempt, and permanent errors (HTTP 400,
//!   401, 403, 404, 422) end the loop at once.
//! - [`RetryConfig::immediate(n)`](RetryConfig::immediate): `n` attempts
//!   back to back, no delay, no deadline, every failure retried the same way.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use super::error::{AttemptError, CompletionError};

/// Default total number of attempts (first call included).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default deadline for a single attempt.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for retry behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Total attempts, the first call included. Values below 1 are treated as 1.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Maximum delay between attempts.
    pub max_delay: Duration,
    /// Backoff multiplier (typically 2.0 for exponential backoff).
    pub multiplier: f64,
    /// Whether to shave the delay to spread out concurrent retries.
    pub jitter: bool,
    /// Deadline for one attempt. `None` leaves timing to the transport.
    pub attempt_timeout: Option<Duration>,
    /// Stop on permanent errors instead of retrying them.
    pub classify_errors: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            multiplier: 2.0,
            jitter: true,
            attempt_timeout: Some(DEFAULT_ATTEMPT_TIMEOUT),
            classify_errors: true,
        }
    }
}

impl RetryConfig {
    /// Hardened defaults with a different attempt budget.
    pub fn with_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    /// Fixed-count, immediate, unclassified retries.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            multiplier: 1.0,
            jitter: false,
            attempt_timeout: None,
            classify_errors: false,
        }
    }

    /// Set the per-attempt deadline (builder pattern).
    pub fn with_attempt_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Calculate the delay after a failed attempt (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.initial_delay.as_secs_f64() * self.multiplier.powi(attempt as i32);
        let capped = base.min(self.max_delay.as_secs_f64());

        if self.jitter {
            // Deterministic jitter keeps tests reproducible without pulling in rand.
            let jitter_factor = match attempt % 4 {
                0 => 0.75,
                1 => 0.90,
                2 => 0.60,
                _ => 0.85,
            };
            Duration::from_secs_f64(capped * jitter_factor)
        } else {
            Duration::from_secs_f64(capped)
        }
    }

    fn attempt_budget(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Run `call` until it succeeds or the budget is spent.
///
/// Attempts are strictly sequential. Returns the value together with the
/// 1-based number of the attempt that produced it.
pub(crate) async fn retry_call<T, F, Fut>(
    config: &RetryConfig,
    mut call: F,
) -> Result<(T, u32), CompletionError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AttemptError>>,
{
    let budget = config.attempt_budget();
    let mut attempt = 0;
    loop {
        attempt += 1;
        let outcome = match config.attempt_timeout {
            Some(limit) => match tokio::time::timeout(limit, call()).await {
                Ok(result) => result,
                Err(_) => Err(AttemptError::Timeout(limit)),
            },
            None => call().await,
        };

        let err = match outcome {
            Ok(v) => {
                debug!("Completion succeeded on attempt {attempt}/{budget}");
                return Ok((v, attempt));
            }
            Err(e) => e,
        };

        if config.classify_errors && err.is_permanent() {
            warn!("Permanent API error on attempt {attempt}/{budget}: {err}. Not retrying.");
            return Err(CompletionError::Rejected {
                attempts: attempt,
                source: err,
            });
        }

        if attempt >= budget {
            warn!("API error on final attempt {attempt}/{budget}: {err}. Giving up.");
            return Err(CompletionError::ExhaustedRetries {
                attempts: attempt,
                last: err,
            });
        }

        let delay = config.delay_for_attempt(attempt - 1);
        warn!("API error (attempt {attempt}/{budget}): {err}. Retrying in {delay:?}...");
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
