//! The seam between the retry loop and whatever actually talks to the
//! completion service.

use std::future::Future;
use std::pin::Pin;

use super::error::AttemptError;
use crate::ChatRequest;

/// The future returned by [`Transport::send`]: the raw generated text, or
/// the reason this attempt failed.
pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = Result<String, AttemptError>> + Send + 'a>>;

/// One outbound chat-completion call.
///
/// Implementations perform exactly one request per `send` and never retry
/// on their own; retrying is the [`CompletionClient`](super::CompletionClient)'s
/// job. The trait is dyn-compatible so clients can hold an
/// `Arc<dyn Transport>`.
pub trait Transport: Send + Sync {
    fn send<'a>(&'a self, request: &'a ChatRequest) -> TransportFuture<'a>;
}

/// Type-erased async handler for [`FnTransport`].
type ErasedSendHandler = Box<
    dyn Fn(ChatRequest) -> Pin<Box<dyn Future<Output = Result<String, AttemptError>> + Send>>
        + Send
        + Sync,
>;

/// A closure-based transport.
///
/// Handy for embedding a non-HTTP backend and for scripting outcomes in
/// tests:
///
/// ```
/// use humanizer::api::{AttemptError, FnTransport};
///
/// let echo = FnTransport::new(|req| async move {
///     req.messages
///         .last()
///         .map(|m| m.content.clone())
///         .ok_or(AttemptError::EmptyResponse)
/// });
/// # let _ = echo;
/// ```
pub struct FnTransport {
    handler: ErasedSendHandler,
}

impl FnTransport {
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn(ChatRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, AttemptError>> + Send + 'static,
    {
        let erased = move |req: ChatRequest| -> Pin<
            Box<dyn Future<Output = Result<String, AttemptError>> + Send>,
        > { Box::pin(handler(req)) };
        Self {
            handler: Box::new(erased),
        }
    }
}

impl Transport for FnTransport {
    fn send<'a>(&'a self, request: &'a ChatRequest) -> TransportFuture<'a> {
        (self.handler)(request.clone())
    }
}
