//! Command-line flags shared by the `humanize` CLI and the web server.

use std::time::Duration;

use clap::Args;

use crate::api::RetryConfig;
use crate::catalog::DEFAULT_MODEL;
use crate::config::{DEFAULT_TEMPERATURE, HumanizerConfig};

/// Completion client settings.
#[derive(Args, Debug, Clone)]
pub struct ClientArgs {
    /// Model to use for completions.
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Default sampling temperature (0.0 – 1.0).
    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    pub temperature: f32,

    /// Total attempts per completion, the first call included.
    #[arg(long, default_value_t = 3)]
    pub max_attempts: u32,

    /// Deadline for one attempt, in seconds. 0 disables the deadline.
    #[arg(long, default_value_t = 60)]
    pub timeout_secs: u64,

    /// Retry immediately on every error, without backoff or classification.
    #[arg(long)]
    pub no_backoff: bool,
}

impl ClientArgs {
    pub fn to_config(&self) -> HumanizerConfig {
        let retry = if self.no_backoff {
            RetryConfig::immediate(self.max_attempts)
        } else {
            RetryConfig::with_attempts(self.max_attempts)
        };
        let timeout = (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs));
        HumanizerConfig {
            model: self.model.clone(),
            temperature: self.temperature,
            retry: retry.with_attempt_timeout(timeout),
            ..Default::default()
        }
    }
}
