//! Convenience re-exports for common `humanizer` types.
//!
//! ```ignore
//! use humanizer::prelude::*;
//! ```

// ── Core types ──────────────────────────────────────────────────────
pub use crate::{ChatRequest, GroqClient, Message};

// ── Completion ──────────────────────────────────────────────────────
pub use crate::api::{
    AttemptError, Completed, CompletionClient, CompletionError, CompletionRequest, FnTransport,
    RetryConfig, Transport,
};

// ── Catalog and composition ─────────────────────────────────────────
pub use crate::catalog::{
    Catalog, Length, Modifier, Modifiers, Person, Strategy, Tone, builtin_catalog,
};
pub use crate::prompt::{compose, compose_with};

// ── Orchestration and config ────────────────────────────────────────
pub use crate::config::HumanizerConfig;
pub use crate::variants::{
    HumanizeRequest, Presentation, RequestError, Variant, VariantPair, humanize_pair,
};
