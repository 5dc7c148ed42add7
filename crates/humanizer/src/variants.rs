//! Two-variant orchestration.
//!
//! One submission rewrites the same text with two strategies. The two
//! completions are independent: they share no state, run concurrently, and
//! one failing does not change the other's outcome. [`VariantPair`] keeps
//! both outcomes, and [`VariantPair::presentation`] applies the
//! all-or-nothing rule the UI uses: results are shown only if both succeed.

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::api::{
    Completed, CompletionClient, CompletionError, CompletionRequest, validate_temperature,
};
use crate::catalog::{Catalog, Modifiers, Strategy, is_supported_model};
use crate::prompt::compose_with;

/// Why a submission was refused before any request was made.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RequestError {
    #[error("Please enter AI-generated text to humanize.")]
    EmptyInput,

    #[error("unknown strategy '{0}'")]
    UnknownStrategy(String),

    #[error("unsupported model '{0}'")]
    UnknownModel(String),

    #[error("temperature {0} is outside [0.0, 1.0]")]
    InvalidTemperature(f32),
}

/// A validated two-variant submission.
#[derive(Debug, Clone, PartialEq)]
pub struct HumanizeRequest {
    text: String,
    strategies: [Strategy; 2],
    modifiers: Modifiers,
    model: String,
    temperature: Option<f32>,
}

impl HumanizeRequest {
    /// Validate a submission. The text is trimmed; blank text is refused.
    pub fn new(
        text: &str,
        strategies: [Strategy; 2],
        model: impl Into<String>,
    ) -> Result<Self, RequestError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RequestError::EmptyInput);
        }
        let model = model.into();
        if !is_supported_model(&model) {
            return Err(RequestError::UnknownModel(model));
        }
        Ok(Self {
            text: text.to_string(),
            strategies,
            modifiers: Modifiers::default(),
            model,
            temperature: None,
        })
    }

    /// Resolve strategy ids against `catalog`, then validate as [`new`](Self::new).
    ///
    /// Blank text is refused first, whatever the ids.
    pub fn from_ids(
        catalog: &Catalog,
        text: &str,
        strategy_ids: [&str; 2],
        model: impl Into<String>,
    ) -> Result<Self, RequestError> {
        if text.trim().is_empty() {
            return Err(RequestError::EmptyInput);
        }
        let [a, b] = strategy_ids.map(|id| {
            catalog
                .strategy(id)
                .cloned()
                .ok_or_else(|| RequestError::UnknownStrategy(id.to_string()))
        });
        Self::new(text, [a?, b?], model)
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Result<Self, RequestError> {
        validate_temperature(temperature).map_err(|_| RequestError::InvalidTemperature(temperature))?;
        self.temperature = Some(temperature);
        Ok(self)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn strategies(&self) -> &[Strategy; 2] {
        &self.strategies
    }

    /// The two completion requests, one per strategy, same input and
    /// modifiers.
    pub fn completion_requests(&self) -> [CompletionRequest; 2] {
        self.strategies.clone().map(|strategy| CompletionRequest {
            prompt: compose_with(&self.text, &strategy, &self.modifiers),
            model: self.model.clone(),
            temperature: self.temperature,
        })
    }
}

/// One successfully rewritten variant.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Variant {
    pub strategy: String,
    pub label: String,
    pub text: String,
    pub attempts: u32,
}

/// The outcome of one variant, success or not.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantOutcome {
    pub strategy: Strategy,
    pub result: Result<Completed, CompletionError>,
}

impl VariantOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Both variants' outcomes, kept separately.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantPair {
    pub a: VariantOutcome,
    pub b: VariantOutcome,
}

/// What the UI shows for a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Presentation {
    /// Both variants succeeded.
    Ready([Variant; 2]),
    /// At least one variant failed; nothing is shown. `errors` lists each
    /// failed variant's label and error.
    Failed { errors: Vec<(String, CompletionError)> },
}

impl VariantPair {
    /// True when exactly one variant succeeded. The all-or-nothing
    /// presentation discards that success.
    pub fn is_partial(&self) -> bool {
        self.a.is_ok() != self.b.is_ok()
    }

    /// Apply the all-or-nothing rule.
    pub fn presentation(self) -> Presentation {
        match (self.a, self.b) {
            (
                VariantOutcome {
                    strategy: sa,
                    result: Ok(ca),
                },
                VariantOutcome {
                    strategy: sb,
                    result: Ok(cb),
                },
            ) => Presentation::Ready([variant(sa, ca), variant(sb, cb)]),
            (a, b) => Presentation::Failed {
                errors: [a, b]
                    .into_iter()
                    .filter_map(|o| o.result.err().map(|e| (o.strategy.label, e)))
                    .collect(),
            },
        }
    }
}

fn variant(strategy: Strategy, completed: Completed) -> Variant {
    Variant {
        strategy: strategy.id,
        label: strategy.label,
        text: completed.text,
        attempts: completed.attempts,
    }
}

/// Rewrite `request.text` with both strategies concurrently.
///
/// A variant whose reply is blank counts as failed.
pub async fn humanize_pair(client: &CompletionClient, request: &HumanizeRequest) -> VariantPair {
    let [req_a, req_b] = request.completion_requests();
    let (res_a, res_b) = tokio::join!(client.complete(&req_a), client.complete(&req_b));
    let res_a = res_a.and_then(Completed::into_non_blank);
    let res_b = res_b.and_then(Completed::into_non_blank);
    let [sa, sb] = request.strategies.clone();

    for (strategy, result) in [(&sa, &res_a), (&sb, &res_b)] {
        match result {
            Ok(c) => info!(
                "Variant '{}' done in {} attempt(s), {} chars",
                strategy.id,
                c.attempts,
                c.text.len()
            ),
            Err(e) => warn!("Variant '{}' failed: {e}", strategy.id),
        }
    }

    VariantPair {
        a: VariantOutcome {
            strategy: sa,
            result: res_a,
        },
        b: VariantOutcome {
            strategy: sb,
            result: res_b,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AttemptError, FnTransport, RetryConfig};
    use crate::catalog::{DEFAULT_MODEL, Modifier, Tone, builtin_catalog};
    use crate::prompt::INPUT_CAPTION;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn request(ids: [&str; 2]) -> HumanizeRequest {
        HumanizeRequest::from_ids(builtin_catalog(), "The weather is nice.", ids, DEFAULT_MODEL)
            .unwrap()
    }

    /// Fails every prompt that contains `poison`; echoes a label otherwise.
    fn client_failing_on(poison: &'static str, calls: Arc<AtomicU32>) -> CompletionClient {
        let transport = FnTransport::new(move |req| {
            calls.fetch_add(1, Ordering::SeqCst);
            let prompt = req.messages[0].content.clone();
            async move {
                if prompt.contains(poison) {
                    Err(AttemptError::Transport("connection refused".into()))
                } else {
                    Ok("Hey, isn't it a lovely day?".to_string())
                }
            }
        });
        CompletionClient::new(Arc::new(transport)).with_retry(RetryConfig::immediate(3))
    }

    #[test]
    fn blank_text_is_refused() {
        let err = HumanizeRequest::from_ids(
            builtin_catalog(),
            " \n\t ",
            ["conversational", "humor"],
            DEFAULT_MODEL,
        )
        .unwrap_err();
        assert_eq!(err, RequestError::EmptyInput);
    }

    #[test]
    fn unknown_ids_are_refused() {
        let err = HumanizeRequest::from_ids(builtin_catalog(), "x", ["conversational", "nope"], DEFAULT_MODEL)
            .unwrap_err();
        assert_eq!(err, RequestError::UnknownStrategy("nope".into()));

        let err = HumanizeRequest::from_ids(builtin_catalog(), "x", ["humor", "humor"], "gpt-4o")
            .unwrap_err();
        assert_eq!(err, RequestError::UnknownModel("gpt-4o".into()));
    }

    #[test]
    fn blank_text_is_refused_before_strategy_lookup() {
        let err = HumanizeRequest::from_ids(builtin_catalog(), "   ", ["humor", "nope"], DEFAULT_MODEL)
            .unwrap_err();
        assert_eq!(err, RequestError::EmptyInput);
    }

    #[test]
    fn temperature_boundaries() {
        assert!(request(["humor", "humor"]).with_temperature(0.0).is_ok());
        assert!(request(["humor", "humor"]).with_temperature(1.0).is_ok());
        assert_eq!(
            request(["humor", "humor"]).with_temperature(-0.01).unwrap_err(),
            RequestError::InvalidTemperature(-0.01)
        );
        assert_eq!(
            request(["humor", "humor"]).with_temperature(1.01).unwrap_err(),
            RequestError::InvalidTemperature(1.01)
        );
    }

    #[test]
    fn completion_requests_share_input_and_modifiers() {
        let req = request(["conversational", "storytelling"])
            .with_modifiers(Modifiers {
                tone: Some(Tone::Casual),
                ..Default::default()
            })
            .with_temperature(0.7)
            .unwrap();
        let [a, b] = req.completion_requests();
        let suffix = format!("{INPUT_CAPTION}\nThe weather is nice.");
        assert!(a.prompt.ends_with(&suffix));
        assert!(b.prompt.ends_with(&suffix));
        assert!(a.prompt.contains(Tone::Casual.instruction()));
        assert!(b.prompt.contains(Tone::Casual.instruction()));
        assert_ne!(a.prompt, b.prompt);
        assert_eq!(a.temperature, Some(0.7));
        assert_eq!(a.model, DEFAULT_MODEL);
    }

    #[test]
    fn input_text_is_trimmed_once() {
        let req = HumanizeRequest::from_ids(
            builtin_catalog(),
            "  padded  ",
            ["humor", "sensory"],
            DEFAULT_MODEL,
        )
        .unwrap();
        assert_eq!(req.text(), "padded");
    }

    #[tokio::test]
    async fn both_succeed_presents_two_variants() {
        let calls = Arc::new(AtomicU32::new(0));
        let client = client_failing_on("\u{0}never", calls.clone());
        let pair = humanize_pair(&client, &request(["conversational", "storytelling"])).await;
        assert!(!pair.is_partial());
        match pair.presentation() {
            Presentation::Ready([a, b]) => {
                assert_eq!(a.strategy, "conversational");
                assert_eq!(b.strategy, "storytelling");
                assert_eq!(a.text, "Hey, isn't it a lovely day?");
                assert_eq!(a.attempts, 1);
            }
            other => panic!("expected Ready, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn one_failure_fails_the_whole_presentation() {
        // The storytelling strategy mentions "narrative arc"; fail only it.
        let calls = Arc::new(AtomicU32::new(0));
        let client = client_failing_on("narrative arc", calls.clone());
        let pair = humanize_pair(&client, &request(["conversational", "storytelling"])).await;

        // Variant A did succeed on its own...
        assert!(pair.a.is_ok());
        assert!(!pair.b.is_ok());
        assert!(pair.is_partial());
        // ...but the all-or-nothing rule discards it.
        match pair.presentation() {
            Presentation::Failed { errors } => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].0, "Approach 4 - Storytelling");
                assert_eq!(errors[0].1.attempts(), 3);
            }
            other => panic!("expected Failed, got {other:?}"),
        }
        // One call for A, three for B.
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn both_failures_are_reported() {
        let calls = Arc::new(AtomicU32::new(0));
        let client = client_failing_on(INPUT_CAPTION, calls.clone());
        let pair = humanize_pair(&client, &request(["humor", "sensory"])).await;
        match pair.presentation() {
            Presentation::Failed { errors } => assert_eq!(errors.len(), 2),
            other => panic!("expected Failed, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn blank_reply_fails_its_variant_after_one_call() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let transport = FnTransport::new(move |req| {
            counter.fetch_add(1, Ordering::SeqCst);
            let prompt = req.messages[0].content.clone();
            async move {
                if prompt.contains("narrative arc") {
                    Ok("   \n".to_string())
                } else {
                    Ok("Hey, isn't it a lovely day?".to_string())
                }
            }
        });
        let client =
            CompletionClient::new(Arc::new(transport)).with_retry(RetryConfig::immediate(3));
        let pair = humanize_pair(&client, &request(["conversational", "storytelling"])).await;

        assert!(pair.a.is_ok());
        assert_eq!(
            pair.b.result,
            Err(CompletionError::BlankText { attempts: 1 })
        );
        match pair.presentation() {
            Presentation::Failed { errors } => assert_eq!(errors.len(), 1),
            other => panic!("expected Failed, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
