//! Rewrite AI-generated text so it reads like a person wrote it.
//!
//! `humanizer` composes a rewriting *strategy* (a fixed instructional
//! template), optional tone / length / narrative-person *modifiers*, and the
//! user's text into one prompt, then sends it to a hosted chat-completion
//! model through a bounded retry loop. Two strategies applied to the same
//! input produce the two side-by-side *variants* the web UI shows.
//!
//! # Getting started
//!
//! ```ignore
//! use humanizer::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), String> {
//!     let config = HumanizerConfig::default();
//!     let client = config.build_client().map_err(|e| e.to_string())?;
//!
//!     let catalog = builtin_catalog();
//!     let request = HumanizeRequest::from_ids(
//!         catalog,
//!         "The weather is nice.",
//!         ["conversational", "storytelling"],
//!         &config.model,
//!     )
//!     .map_err(|e| e.to_string())?
//!     .with_temperature(config.temperature)
//!     .map_err(|e| e.to_string())?;
//!
//!     match humanize_pair(&client, &request).await.presentation() {
//!         Presentation::Ready(variants) => {
//!             for v in variants {
//!                 println!("### {}\n{}", v.label, v.text);
//!             }
//!         }
//!         Presentation::Failed { .. } => eprintln!("Failed to humanize the text."),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`catalog`] | Built-in strategies, modifiers and supported models |
//! | [`prompt`] | [`compose`](prompt::compose): strategy + modifiers + input text |
//! | [`api`] | [`Transport`](api::Transport) seam, [`CompletionClient`](api::CompletionClient) retry loop |
//! | [`variants`] | Two-variant orchestration and the all-or-nothing presentation rule |
//! | [`config`] | [`HumanizerConfig`](config::HumanizerConfig) and API key resolution |

pub mod api;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod logging;
pub mod prelude;
pub mod prompt;
pub mod variants;

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use crate::api::{AttemptError, Transport, TransportFuture};
use crate::config::ConfigError;

// ── Constants ──────────────────────────────────────────────────────

pub const GROQ_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Hard ceiling for a single HTTP exchange, independent of the retry
/// policy's per-attempt timeout.
const HTTP_TIMEOUT: Duration = Duration::from_secs(120);

// ── Request types ──────────────────────────────────────────────────

/// Chat completion request body (OpenAI-compatible schema).
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

// ── Message types ──────────────────────────────────────────────────

/// A user-role message. Every request carries exactly one, holding the
/// composed prompt.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Message {
    role: &'static str,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

// ── Response types ─────────────────────────────────────────────────

/// Raw API response (internal deserialization target).
#[derive(Deserialize, Debug)]
struct RawChatResponse {
    choices: Option<Vec<RawChoice>>,
    error: Option<ApiErrorResponse>,
    #[serde(default)]
    usage: Option<UsageInfo>,
}

#[derive(Deserialize, Debug)]
struct RawChoice {
    message: RawResponseMessage,
}

#[derive(Deserialize, Debug)]
struct RawResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorResponse {
    message: String,
}

/// Token usage statistics.
#[derive(Deserialize, Debug, Clone)]
pub struct UsageInfo {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}

// ── Client ─────────────────────────────────────────────────────────

/// Async HTTP client for the Groq chat completions API.
pub struct GroqClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl GroqClient {
    /// Create a client that talks to [`GROQ_URL`].
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("humanizer/", env!("CARGO_PKG_VERSION")))
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: GROQ_URL.to_string(),
        })
    }

    /// Point the client at another OpenAI-compatible endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Send one chat completion request and return the raw message text.
    pub async fn chat(&self, body: &ChatRequest) -> Result<String, AttemptError> {
        debug!(
            "LLM request: model={}, messages={}, temp={:?}",
            body.model,
            body.messages.len(),
            body.temperature,
        );
        trace!(
            "Request payload size: {} bytes",
            serde_json::to_string(body).map_or(0, |s| s.len())
        );

        let start = Instant::now();

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| AttemptError::Transport(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| AttemptError::Transport(format!("failed to read response: {e}")))?;

        debug!(
            "LLM response: HTTP {} in {:.1}s ({} bytes)",
            status,
            start.elapsed().as_secs_f64(),
            text.len()
        );

        if !status.is_success() {
            return Err(AttemptError::Service {
                status: status.as_u16(),
                message: text,
            });
        }

        let parsed: RawChatResponse =
            serde_json::from_str(&text).map_err(|e| AttemptError::Service {
                status: status.as_u16(),
                message: format!("failed to parse response: {e}"),
            })?;

        if let Some(err) = parsed.error {
            return Err(AttemptError::Service {
                status: status.as_u16(),
                message: err.message,
            });
        }

        if let Some(ref usage) = parsed.usage {
            debug!(
                "Token usage: prompt={}, completion={}, total={}",
                usage.prompt_tokens.unwrap_or(0),
                usage.completion_tokens.unwrap_or(0),
                usage.total_tokens.unwrap_or(0),
            );
        }

        parsed
            .choices
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.message.content)
            .ok_or(AttemptError::EmptyResponse)
    }
}

impl Transport for GroqClient {
    fn send<'a>(&'a self, request: &'a ChatRequest) -> TransportFuture<'a> {
        Box::pin(self.chat(request))
    }
}
