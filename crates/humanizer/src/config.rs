//! Runtime configuration with sensible defaults.
//!
//! [`HumanizerConfig`] holds the knobs a front end needs (model, default
//! temperature, retry policy, where to find the API key) and turns them into
//! a ready [`CompletionClient`] via [`build_client`](HumanizerConfig::build_client).

use std::env;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::GroqClient;
use crate::api::{CompletionClient, RetryConfig};
use crate::catalog::{CatalogError, DEFAULT_MODEL, is_supported_model};

/// Environment variable holding the completion service API key.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Fatal startup problems.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not found in environment variables. Please set it and restart the app.")]
    MissingApiKey(String),

    #[error("default temperature {0} is outside [0.0, 1.0]")]
    InvalidTemperature(f32),

    #[error("unsupported model '{0}'")]
    UnknownModel(String),

    #[error("max attempts must be at least 1")]
    InvalidAttempts,

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Configuration for a humanizer front end.
#[derive(Debug, Clone, PartialEq)]
pub struct HumanizerConfig {
    /// Model identifier. Default: `"llama3-8b-8192"`.
    pub model: String,
    /// Temperature used when a submission does not choose one. Default: `0.7`.
    pub temperature: f32,
    /// Retry policy for every completion. Default: [`RetryConfig::default()`].
    pub retry: RetryConfig,
    /// Environment variable to read the API key from. Default: `GROQ_API_KEY`.
    pub api_key_env: String,
}

impl Default for HumanizerConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            retry: RetryConfig::default(),
            api_key_env: API_KEY_ENV.to_string(),
        }
    }
}

impl HumanizerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_supported_model(&self.model) {
            return Err(ConfigError::UnknownModel(self.model.clone()));
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(ConfigError::InvalidTemperature(self.temperature));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidAttempts);
        }
        Ok(())
    }

    /// Read the API key from [`api_key_env`](Self::api_key_env).
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        api_key_from_env(&self.api_key_env)
    }

    /// Validate, resolve the key, and build a Groq-backed client.
    pub fn build_client(&self) -> Result<CompletionClient, ConfigError> {
        self.validate()?;
        let key = self.resolve_api_key()?;
        let transport = GroqClient::new(key)?;
        debug!(
            "Built completion client: model={}, max_attempts={}, timeout={:?}",
            self.model, self.retry.max_attempts, self.retry.attempt_timeout
        );
        Ok(CompletionClient::new(Arc::new(transport)).with_retry(self.retry.clone()))
    }
}

/// Read a non-blank API key from environment variable `var`.
pub fn api_key_from_env(var: &str) -> Result<String, ConfigError> {
    match env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ConfigError::MissingApiKey(var.to_string())),
    }
}
