//! Completion-service interaction: the transport seam, the retry policy and
//! the retrying [`CompletionClient`].
//!
//! - [`transport`]: the object-safe [`Transport`] trait every backend
//!   implements, plus [`FnTransport`] for closure-based backends.
//! - [`retry`]: [`RetryConfig`] with optional backoff, jitter, per-attempt
//!   timeout and error classification.
//! - [`completion`]: validation of a [`CompletionRequest`] and the bounded,
//!   strictly sequential attempt loop.
//! - [`error`]: per-attempt [`AttemptError`] and the final [`CompletionError`].

pub mod completion;
pub mod error;
pub mod retry;
pub mod transport;

// Re-export commonly used items at the module level.
pub use completion::{Completed, CompletionClient, CompletionRequest, validate_temperature};
pub use error::{AttemptError, CompletionError};
pub use retry::RetryConfig;
pub use transport::{FnTransport, Transport, TransportFuture};
