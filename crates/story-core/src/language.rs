//! Language detection for user text.
//!
//! Detection is purely lexical: script-level signals (Vietnamese diacritics)
//! are checked before function-word overlap, and English is the default.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use unicode_normalization::UnicodeNormalization;

use crate::error::AssistError;

/// Number of leading characters inspected by [`detect_language`].
pub const DETECTION_SAMPLE_CHARS: usize = 4000;

/// Characters that only appear in Vietnamese among the supported languages.
const VI_DIACRITICS: &str = "ăâđêôơưáàảạãắằẳẵặấầẩẫậếềễệốồổỗộớờởỡợứừửữự";

/// Common Vietnamese function words, space-delimited.
const VI_FUNCTION_WORDS: &[&str] = &[" và ", " không ", " những ", " của ", " cho ", " có "];

/// Common English function words, space-delimited.
const EN_FUNCTION_WORDS: &[&str] = &[" the ", " and ", " is ", " you ", " to ", " of "];

/// A supported working language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    #[default]
    En,
    /// Vietnamese.
    Vi,
}

impl Language {
    /// All supported languages.
    pub const ALL: [Language; 2] = [Language::En, Language::Vi];

    /// ISO 639-1 code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Vi => "vi",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = AssistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Self::En),
            "vi" => Ok(Self::Vi),
            other => Err(AssistError::InvalidInput(format!("unsupported language: {}", other))),
        }
    }
}

/// How the language of an invocation is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LanguageChoice {
    /// Detect the language from the input text.
    #[default]
    Auto,
    /// Use the given language regardless of the input.
    Pinned(Language),
}

impl LanguageChoice {
    /// Resolve to a concrete language for the given input sample.
    pub fn resolve(&self, sample: &str) -> Language {
        match self {
            Self::Auto => detect_language(sample),
            Self::Pinned(language) => *language,
        }
    }
}

impl FromStr for LanguageChoice {
    type Err = AssistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        s.parse().map(Self::Pinned)
    }
}

impl fmt::Display for LanguageChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Pinned(language) => write!(f, "{}", language),
        }
    }
}

impl From<Language> for LanguageChoice {
    fn from(language: Language) -> Self {
        Self::Pinned(language)
    }
}

/// Classify a text sample as one of the supported languages.
///
/// Only the first [`DETECTION_SAMPLE_CHARS`] characters are examined.
/// First match wins: Vietnamese diacritics, then Vietnamese function words,
/// then English function words, then the English default.
pub fn detect_language(text: &str) -> Language {
    if text.is_empty() {
        return Language::En;
    }

    let sample = normalize_text(&text.chars().take(DETECTION_SAMPLE_CHARS).collect::<String>());

    if sample.chars().any(|c| VI_DIACRITICS.contains(c)) {
        return Language::Vi;
    }

    if VI_FUNCTION_WORDS.iter().any(|w| sample.contains(w)) {
        return Language::Vi;
    }

    if EN_FUNCTION_WORDS.iter().any(|w| sample.contains(w)) {
        return Language::En;
    }

    Language::En
}

/// Compose `text` to NFC and lowercase it for keyword matching.
///
/// Decomposed input (a base letter followed by combining marks, as some
/// keyboards and pasted documents produce) compares equal to the
/// precomposed word lists afterwards.
pub fn normalize_text(text: &str) -> String {
    text.nfc().collect::<String>().to_lowercase()
}
