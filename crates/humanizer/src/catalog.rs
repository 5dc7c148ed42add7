//! Static lookup tables: rewriting strategies, modifier fragments and the
//! supported model ids.
//!
//! Everything here is data. The built-in [`Catalog`] is built once on first
//! use and never mutated; callers that want extra strategies clone it and
//! merge entries from JSON with [`Catalog::extend_from_json`].

use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Strategies ─────────────────────────────────────────────────────

/// A named rewriting style and the instructions sent to the model.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Strategy {
    pub id: String,
    pub label: String,
    pub instructions: String,
}

/// `(id, label, instructions)` for every built-in strategy.
const BUILTIN_STRATEGIES: &[(&str, &str, &str)] = &[
    (
        "conversational",
        "Approach 1 - Conversational Tone",
        "To humanize the prompt for a text-generative AI, you can make it more conversational and engaging. Here's how:

1. Start with a friendly greeting or introduction.
2. Use informal language and contractions.
3. Incorporate personal anecdotes or thoughts.
4. Ask open-ended questions to engage the reader.
5. Use emotive language to express feelings.",
    ),
    (
        "sentence_structure",
        "Approach 2 - Vary Sentence Structure",
        "To make the following text sound more natural and human-like:

1. Vary sentence length and structure.
2. Use contractions.
3. Add filler words or phrases.
4. Incorporate colloquialisms.
5. Include rhetorical questions.
6. Use active voice.",
    ),
    (
        "sensory",
        "Approach 3 - Sensory Language",
        "Humanize the text by:

1. Using vivid sensory details.
2. Incorporating metaphors or similes.
3. Sharing personal experiences.
4. Expressing emotions openly.
5. Engaging the reader's imagination.",
    ),
    (
        "storytelling",
        "Approach 4 - Storytelling",
        "Transform the text by:

1. Framing it as a story.
2. Introducing characters or personas.
3. Building a narrative arc.
4. Including dialogue where appropriate.
5. Concluding with a personal reflection.",
    ),
    (
        "humor",
        "Approach 5 - Humor and Wit",
        "Make the text more human by:

1. Adding humorous observations.
2. Using witty remarks.
3. Incorporating light-hearted sarcasm.
4. Including relatable anecdotes.
5. Keeping the tone casual and fun.",
    ),
];

static BUILTIN: LazyLock<Catalog> = LazyLock::new(|| Catalog {
    strategies: BUILTIN_STRATEGIES
        .iter()
        .map(|(id, label, instructions)| Strategy {
            id: (*id).to_string(),
            label: (*label).to_string(),
            instructions: (*instructions).to_string(),
        })
        .collect(),
});

/// The process-wide built-in catalog.
pub fn builtin_catalog() -> &'static Catalog {
    &BUILTIN
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read strategy file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse strategies: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("strategy '{id}' is invalid: {reason}")]
    Invalid { id: String, reason: &'static str },
}

/// An ordered set of strategies, unique by id.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    strategies: Vec<Strategy>,
}

impl Catalog {
    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    pub fn strategy(&self, id: &str) -> Option<&Strategy> {
        self.strategies.iter().find(|s| s.id == id)
    }

    /// Insert or replace a strategy by id. New ids keep insertion order.
    pub fn upsert(&mut self, strategy: Strategy) {
        if let Some(idx) = self.strategies.iter().position(|s| s.id == strategy.id) {
            self.strategies[idx] = strategy;
        } else {
            self.strategies.push(strategy);
        }
    }

    /// Merge a JSON array of `{id, label, instructions}` objects.
    ///
    /// The whole batch is validated before anything is merged. Returns the
    /// number of entries merged.
    pub fn extend_from_json(&mut self, json: &str) -> Result<usize, CatalogError> {
        let entries: Vec<Strategy> = serde_json::from_str(json)?;
        for entry in &entries {
            if entry.id.trim().is_empty() {
                return Err(CatalogError::Invalid {
                    id: entry.id.clone(),
                    reason: "id is empty",
                });
            }
            if entry.instructions.trim().is_empty() {
                return Err(CatalogError::Invalid {
                    id: entry.id.clone(),
                    reason: "instructions are empty",
                });
            }
        }
        let count = entries.len();
        for entry in entries {
            self.upsert(entry);
        }
        Ok(count)
    }

    /// Read a strategy file and merge it with [`extend_from_json`](Self::extend_from_json).
    pub fn extend_from_file(&mut self, path: &Path) -> Result<usize, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.extend_from_json(&content)
    }
}

// ── Modifiers ──────────────────────────────────────────────────────

/// One axis of optional instructions appended after the strategy.
pub trait Modifier: Copy + 'static {
    /// Axis name used in the API and CLI (`tone`, `length`, `person`).
    const AXIS: &'static str;

    fn all() -> &'static [Self];
    fn id(&self) -> &'static str;
    fn label(&self) -> &'static str;
    fn instruction(&self) -> &'static str;

    fn from_id(id: &str) -> Option<Self> {
        Self::all().iter().copied().find(|m| m.id() == id)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Casual,
    Neutral,
    Professional,
    Enthusiastic,
}

impl Modifier for Tone {
    const AXIS: &'static str = "tone";

    fn all() -> &'static [Self] {
        &[Tone::Casual, Tone::Neutral, Tone::Professional, Tone::Enthusiastic]
    }

    fn id(&self) -> &'static str {
        match self {
            Tone::Casual => "casual",
            Tone::Neutral => "neutral",
            Tone::Professional => "professional",
            Tone::Enthusiastic => "enthusiastic",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Tone::Casual => "Casual",
            Tone::Neutral => "Neutral",
            Tone::Professional => "Professional",
            Tone::Enthusiastic => "Enthusiastic",
        }
    }

    fn instruction(&self) -> &'static str {
        match self {
            Tone::Casual => "Keep the tone relaxed and informal, like talking to a friend.",
            Tone::Neutral => "Keep the tone balanced and matter-of-fact.",
            Tone::Professional => {
                "Keep the tone polished and professional while still sounding like a person."
            }
            Tone::Enthusiastic => "Make the tone upbeat and enthusiastic.",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Length {
    Shorter,
    Same,
    Longer,
}

impl Modifier for Length {
    const AXIS: &'static str = "length";

    fn all() -> &'static [Self] {
        &[Length::Shorter, Length::Same, Length::Longer]
    }

    fn id(&self) -> &'static str {
        match self {
            Length::Shorter => "shorter",
            Length::Same => "same",
            Length::Longer => "longer",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Length::Shorter => "Shorter",
            Length::Same => "About the same",
            Length::Longer => "Longer",
        }
    }

    fn instruction(&self) -> &'static str {
        match self {
            Length::Shorter => "Make the rewrite noticeably shorter than the original.",
            Length::Same => "Keep the rewrite about the same length as the original.",
            Length::Longer => "Expand the rewrite so it is noticeably longer than the original.",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Person {
    First,
    Second,
    Third,
}

impl Modifier for Person {
    const AXIS: &'static str = "person";

    fn all() -> &'static [Self] {
        &[Person::First, Person::Second, Person::Third]
    }

    fn id(&self) -> &'static str {
        match self {
            Person::First => "first",
            Person::Second => "second",
            Person::Third => "third",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Person::First => "First person",
            Person::Second => "Second person",
            Person::Third => "Third person",
        }
    }

    fn instruction(&self) -> &'static str {
        match self {
            Person::First => "Write in the first person (I, we).",
            Person::Second => "Write in the second person, addressing the reader as you.",
            Person::Third => "Write in the third person (he, she, they, it).",
        }
    }
}

/// The selected value on each modifier axis; every axis is optional.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub tone: Option<Tone>,
    pub length: Option<Length>,
    pub person: Option<Person>,
}

impl Modifiers {
    /// Instruction fragments in composition order: tone, length, person.
    pub fn fragments(&self) -> Vec<&'static str> {
        [
            self.tone.map(|m| m.instruction()),
            self.length.map(|m| m.instruction()),
            self.person.map(|m| m.instruction()),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Serializable description of one modifier value.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ModifierOption {
    pub id: &'static str,
    pub label: &'static str,
    pub instruction: &'static str,
}

/// Every value of modifier axis `M`, for catalogs shown to users.
pub fn modifier_options<M: Modifier>() -> Vec<ModifierOption> {
    M::all()
        .iter()
        .map(|m| ModifierOption {
            id: m.id(),
            label: m.label(),
            instruction: m.instruction(),
        })
        .collect()
}

/// Parse an optional modifier id. Blank input means "not selected".
pub fn parse_modifier<M: Modifier>(id: Option<&str>) -> Result<Option<M>, String> {
    match id.map(str::trim) {
        None | Some("") => Ok(None),
        Some(id) => M::from_id(id)
            .map(Some)
            .ok_or_else(|| format!("unknown {} '{id}'", M::AXIS)),
    }
}

// ── Models ─────────────────────────────────────────────────────────

/// A remote model the completion service accepts.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModelInfo {
    pub name: &'static str,
    pub id: &'static str,
}

pub const SUPPORTED_MODELS: &[ModelInfo] = &[
    ModelInfo {
        name: "Llama 3 8B",
        id: "llama3-8b-8192",
    },
    ModelInfo {
        name: "Llama 3.1 70B",
        id: "llama-3.1-70b-versatile",
    },
    ModelInfo {
        name: "Llama 3.1 8B",
        id: "llama-3.1-8b-instant",
    },
    ModelInfo {
        name: "Mixtral 8x7B",
        id: "mixtral-8x7b-32768",
    },
    ModelInfo {
        name: "Gemma 2 9B",
        id: "gemma2-9b-it",
    },
    ModelInfo {
        name: "LLaVA 1.5 7B",
        id: "llava-v1.5-7b-4096-preview",
    },
];

/// Default model for all completions: the first entry of [`SUPPORTED_MODELS`].
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";

pub fn is_supported_model(id: &str) -> bool {
    SUPPORTED_MODELS.iter().any(|m| m.id == id)
}
