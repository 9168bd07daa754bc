//! Results tagged with their language and origin.

use serde::{Deserialize, Serialize};

use crate::language::Language;

/// Where a payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Parsed from a model completion.
    Model,
    /// Produced by the deterministic fallback engine.
    Fallback,
}

/// A payload tagged with the detected input language and its source.
///
/// `source` is never [`Source::Model`] when the fallback path produced the
/// payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assisted<T> {
    /// Language detected from the input (or pinned by the caller).
    pub language: Language,
    /// Operation-specific result.
    pub payload: T,
    /// Whether the payload is model-backed or heuristic.
    pub source: Source,
}

impl<T> Assisted<T> {
    /// Wrap a payload parsed from a model completion.
    pub fn from_model(language: Language, payload: T) -> Self {
        Self {
            language,
            payload,
            source: Source::Model,
        }
    }

    /// Wrap a payload produced by the fallback engine.
    pub fn from_fallback(language: Language, payload: T) -> Self {
        Self {
            language,
            payload,
            source: Source::Fallback,
        }
    }

    /// Check whether the payload came from the model.
    pub fn is_model(&self) -> bool {
        self.source == Source::Model
    }

    /// Transform the payload, keeping language and source.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Assisted<U> {
        Assisted {
            language: self.language,
            payload: f(self.payload),
            source: self.source,
        }
    }
}
