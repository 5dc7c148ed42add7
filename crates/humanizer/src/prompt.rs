//! Prompt composition.
//!
//! A prompt is a sequence of segments separated by one blank line, always in
//! the same order: strategy instructions, modifier fragments, then the user's
//! text under a fixed caption. The user's text is appended verbatim, so it is
//! always the exact suffix of the composed prompt.

use crate::catalog::{Modifiers, Strategy};

/// Caption placed on the line before the user's text.
pub const INPUT_CAPTION: &str = "Text to humanize:";

const SEGMENT_SEPARATOR: &str = "\n\n";

/// Builder for a humanization prompt.
///
/// Empty segments (blank strategy text, blank fragments, `None` options) are
/// skipped so the output never contains runs of blank lines.
///
/// ```
/// use humanizer::prompt::PromptBuilder;
///
/// let prompt = PromptBuilder::new("Rewrite this.")
///     .fragment("Keep it short.")
///     .fragment_opt(None::<&str>)
///     .build("Hello there.");
///
/// assert_eq!(prompt, "Rewrite this.\n\nKeep it short.\n\nText to humanize:\nHello there.");
/// ```
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    segments: Vec<String>,
}

impl PromptBuilder {
    /// Start a prompt with the strategy instructions.
    pub fn new(strategy: impl Into<String>) -> Self {
        Self {
            segments: Vec::new(),
        }
        .fragment(strategy)
    }

    /// Append one instruction fragment. Skipped if blank.
    pub fn fragment(mut self, content: impl Into<String>) -> Self {
        let content = content.into();
        if !content.trim().is_empty() {
            self.segments.push(content);
        }
        self
    }

    /// Append a fragment only if it is `Some`.
    pub fn fragment_opt(self, content: Option<impl Into<String>>) -> Self {
        match content {
            Some(c) => self.fragment(c),
            None => self,
        }
    }

    /// Append several fragments in order.
    pub fn fragments<S: AsRef<str>>(self, fragments: &[S]) -> Self {
        fragments
            .iter()
            .fold(self, |builder, f| builder.fragment(f.as_ref()))
    }

    /// Finish the prompt with the captioned input text.
    pub fn build(self, input_text: &str) -> String {
        let mut out = self.segments.join(SEGMENT_SEPARATOR);
        if !out.is_empty() {
            out.push_str(SEGMENT_SEPARATOR);
        }
        out.push_str(INPUT_CAPTION);
        out.push('\n');
        out.push_str(input_text);
        out
    }
}

/// Compose a prompt from strategy text, modifier fragments (in the order
/// given) and the input text.
pub fn compose<S: AsRef<str>>(input_text: &str, strategy: &str, modifiers: &[S]) -> String {
    PromptBuilder::new(strategy)
        .fragments(modifiers)
        .build(input_text)
}

/// Compose a prompt from catalog types: strategy, then tone, length, person.
pub fn compose_with(input_text: &str, strategy: &Strategy, modifiers: &Modifiers) -> String {
    let fragments = modifiers.fragments();
    compose(input_text, &strategy.instructions, fragments.as_slice())
}
