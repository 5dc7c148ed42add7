//! The retrying completion client.

use std::sync::Arc;

use tracing::debug;

use super::error::CompletionError;
use super::retry::{RetryConfig, retry_call};
use super::transport::Transport;
use crate::{ChatRequest, Message};

/// One completion request: composed prompt, target model, optional
/// temperature. Built fresh for every call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub model: String,
    /// `None` leaves the choice to the service default.
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Reject requests that must never reach the wire.
    pub fn validate(&self) -> Result<(), CompletionError> {
        if self.prompt.trim().is_empty() {
            return Err(CompletionError::EmptyPrompt);
        }
        if let Some(t) = self.temperature {
            validate_temperature(t)?;
        }
        Ok(())
    }

    fn to_chat_request(&self) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![Message::user(&self.prompt)],
            temperature: self.temperature,
        }
    }
}

/// Check that `temperature` lies in `[0.0, 1.0]`. NaN is rejected.
pub fn validate_temperature(temperature: f32) -> Result<f32, CompletionError> {
    if (0.0..=1.0).contains(&temperature) {
        Ok(temperature)
    } else {
        Err(CompletionError::InvalidTemperature(temperature))
    }
}

/// A successful completion.
#[derive(Debug, Clone, PartialEq)]
pub struct Completed {
    /// Trimmed generated text. May be empty.
    pub text: String,
    /// 1-based number of the attempt that succeeded.
    pub attempts: u32,
}

impl Completed {
    /// Refuse a reply that trimmed to nothing.
    pub fn into_non_blank(self) -> Result<Self, CompletionError> {
        if self.text.is_empty() {
            Err(CompletionError::BlankText {
                attempts: self.attempts,
            })
        } else {
            Ok(self)
        }
    }
}

/// Wraps a [`Transport`] with validation and the bounded retry loop.
///
/// Cloning is cheap; clones share the transport.
#[derive(Clone)]
pub struct CompletionClient {
    transport: Arc<dyn Transport>,
    retry: RetryConfig,
}

impl CompletionClient {
    /// Create a client with the default (hardened) retry policy.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            retry: RetryConfig::default(),
        }
    }

    /// Replace the retry policy (builder pattern).
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// Complete `request`, retrying per the configured policy.
    ///
    /// Invalid requests fail before any transport call. The first reply the
    /// transport delivers ends the loop, even one that trims to nothing.
    pub async fn complete(&self, request: &CompletionRequest) -> Result<Completed, CompletionError> {
        request.validate()?;
        let body = request.to_chat_request();
        debug!(
            "Completing prompt: model={}, {} chars, temp={:?}, max_attempts={}",
            request.model,
            request.prompt.len(),
            request.temperature,
            self.retry.max_attempts,
        );

        let (raw, attempts) = retry_call(&self.retry, || self.transport.send(&body)).await?;
        Ok(Completed {
            text: raw.trim().to_string(),
            attempts,
        })
    }
}

impl std::fmt::Debug for CompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionClient")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AttemptError, FnTransport};
    use crate::catalog::builtin_catalog;
    use crate::prompt::compose;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// A transport that fails the first `failures` calls, then answers
    /// `reply`. Returns the shared call counter alongside.
    fn scripted(failures: u32, reply: &'static str) -> (Arc<dyn Transport>, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let transport = FnTransport::new(move |_req| {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n <= failures {
                    Err(AttemptError::Service {
                        status: 503,
                        message: "over capacity".into(),
                    })
                } else {
                    Ok(reply.to_string())
                }
            }
        });
        (Arc::new(transport), calls)
    }

    fn conversational_prompt(input: &str) -> String {
        let strategy = builtin_catalog().strategy("conversational").unwrap();
        compose(input, &strategy.instructions, &[] as &[&str])
    }

    #[tokio::test]
    async fn first_attempt_success_returns_immediately() {
        let (transport, calls) = scripted(0, "Hey, isn't it a lovely day?");
        let client = CompletionClient::new(transport).with_retry(RetryConfig::immediate(3));
        let request = CompletionRequest::new(
            conversational_prompt("The weather is nice."),
            "llama-3.1-8b-instant",
        );

        let done = client.complete(&request).await.unwrap();
        assert_eq!(done.text, "Hey, isn't it a lovely day?");
        assert_eq!(done.attempts, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn success_on_third_attempt() {
        let (transport, calls) = scripted(2, "Hey, isn't it a lovely day?");
        let client = CompletionClient::new(transport).with_retry(RetryConfig::immediate(3));
        let request = CompletionRequest::new(
            conversational_prompt("The weather is nice."),
            "llama-3.1-8b-instant",
        );

        let done = client.complete(&request).await.unwrap();
        assert_eq!(done.text, "Hey, isn't it a lovely day?");
        assert_eq!(done.attempts, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn always_failing_transport_makes_exactly_max_attempts() {
        for max in 1..=5 {
            let (transport, calls) = scripted(u32::MAX, "unused");
            let client =
                CompletionClient::new(transport).with_retry(RetryConfig::immediate(max));
            let err = client
                .complete(&CompletionRequest::new("prompt", "m"))
                .await
                .unwrap_err();
            assert_eq!(calls.load(Ordering::SeqCst), max);
            assert!(matches!(
                err,
                CompletionError::ExhaustedRetries { attempts, .. } if attempts == max
            ));
        }
    }

    #[tokio::test]
    async fn success_on_attempt_k_makes_exactly_k_calls() {
        for k in 1..=4 {
            let (transport, calls) = scripted(k - 1, "ok");
            let client = CompletionClient::new(transport).with_retry(RetryConfig::immediate(4));
            let done = client
                .complete(&CompletionRequest::new("prompt", "m"))
                .await
                .unwrap();
            assert_eq!(done.attempts, k);
            assert_eq!(calls.load(Ordering::SeqCst), k);
        }
    }

    #[tokio::test]
    async fn exhausted_retries_carry_last_error() {
        let (transport, _calls) = scripted(3, "unused");
        let client = CompletionClient::new(transport).with_retry(RetryConfig::immediate(3));
        let err = client
            .complete(&CompletionRequest::new("prompt", "m"))
            .await
            .unwrap_err();
        assert_eq!(err.attempts(), 3);
        assert_eq!(
            err.last_error(),
            Some(&AttemptError::Service {
                status: 503,
                message: "over capacity".into()
            })
        );
    }

    #[tokio::test]
    async fn temperature_bounds_checked_before_dispatch() {
        for (t, ok) in [(0.0, true), (1.0, true), (-0.01, false), (1.01, false)] {
            let (transport, calls) = scripted(0, "fine");
            let client = CompletionClient::new(transport).with_retry(RetryConfig::immediate(3));
            let request = CompletionRequest::new("prompt", "m").with_temperature(t);
            let result = client.complete(&request).await;
            if ok {
                assert!(result.is_ok(), "temperature {t} should be accepted");
                assert_eq!(calls.load(Ordering::SeqCst), 1);
            } else {
                assert_eq!(result, Err(CompletionError::InvalidTemperature(t)));
                assert_eq!(calls.load(Ordering::SeqCst), 0, "no dispatch for {t}");
            }
        }
    }

    #[tokio::test]
    async fn nan_temperature_rejected() {
        assert!(validate_temperature(f32::NAN).is_err());
    }

    #[tokio::test]
    async fn blank_prompt_rejected_without_dispatch() {
        let (transport, calls) = scripted(0, "fine");
        let client = CompletionClient::new(transport);
        let result = client.complete(&CompletionRequest::new("  \n", "m")).await;
        assert_eq!(result, Err(CompletionError::EmptyPrompt));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn whitespace_only_reply_ends_the_loop() {
        let (transport, calls) = scripted(0, "  \n\t ");
        let client = CompletionClient::new(transport).with_retry(RetryConfig::immediate(3));
        let done = client
            .complete(&CompletionRequest::new("prompt", "m"))
            .await
            .unwrap();
        assert_eq!(done.text, "");
        assert_eq!(done.attempts, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert_eq!(
            done.into_non_blank(),
            Err(CompletionError::BlankText { attempts: 1 })
        );
    }

    #[test]
    fn non_blank_text_passes_through() {
        let done = Completed {
            text: "hi".into(),
            attempts: 2,
        };
        assert_eq!(done.clone().into_non_blank(), Ok(done));
    }

    #[tokio::test]
    async fn request_forwards_model_temperature_and_prompt() {
        let transport = FnTransport::new(|req: ChatRequest| async move {
            assert_eq!(req.model, "gemma2-9b-it");
            assert_eq!(req.temperature, Some(0.2));
            assert_eq!(req.messages.len(), 1);
            Ok(req.messages[0].content.clone())
        });
        let client = CompletionClient::new(Arc::new(transport));
        let request = CompletionRequest::new("echo me", "gemma2-9b-it").with_temperature(0.2);
        assert_eq!(client.complete(&request).await.unwrap().text, "echo me");
    }
}
