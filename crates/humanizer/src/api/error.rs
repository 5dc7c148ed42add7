//! Completion error types.

use std::time::Duration;
use thiserror::Error;

/// Why a single attempt against the completion service failed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AttemptError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("attempt timed out after {0:?}")]
    Timeout(Duration),

    #[error("completion service HTTP {status}: {message}")]
    Service { status: u16, message: String },

    #[error("completion service returned no message content")]
    EmptyResponse,
}

impl AttemptError {
    /// Failures that will not change on retry: malformed requests, bad
    /// credentials, unknown models. Rate limits, server errors, network
    /// trouble, timeouts and missing content are all worth another attempt.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            AttemptError::Service {
                status: 400 | 401 | 403 | 404 | 422,
                ..
            }
        )
    }
}

/// Final outcome of a failed [`complete`](super::CompletionClient::complete) call.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CompletionError {
    #[error("temperature {0} is outside [0.0, 1.0]")]
    InvalidTemperature(f32),

    #[error("prompt is empty")]
    EmptyPrompt,

    #[error("an error occurred after {attempts} attempt(s): {last}")]
    ExhaustedRetries { attempts: u32, last: AttemptError },

    #[error("request rejected on attempt {attempts}: {source}")]
    Rejected { attempts: u32, source: AttemptError },

    /// The call succeeded but the reply was blank after trimming. Produced
    /// by callers that cannot use blank text, never by the retry loop.
    #[error("the model returned blank text on attempt {attempts}")]
    BlankText { attempts: u32 },
}

impl CompletionError {
    /// Number of transport calls made before giving up.
    pub fn attempts(&self) -> u32 {
        match self {
            CompletionError::InvalidTemperature(_) | CompletionError::EmptyPrompt => 0,
            CompletionError::ExhaustedRetries { attempts, .. }
            | CompletionError::Rejected { attempts, .. }
            | CompletionError::BlankText { attempts } => *attempts,
        }
    }

    /// The underlying error of the final attempt, if any attempt was made.
    pub fn last_error(&self) -> Option<&AttemptError> {
        match self {
            CompletionError::ExhaustedRetries { last, .. } => Some(last),
            CompletionError::Rejected { source, .. } => Some(source),
            _ => None,
        }
    }
}
