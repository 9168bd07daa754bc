//! Operation inputs and per-call options.

use serde::{Deserialize, Serialize};
use story_core::{AssistError, LanguageChoice, Operation, Tone};

/// Maximum number of keywords kept by [`parse_keywords`].
pub const MAX_KEYWORDS: usize = 5;

/// The input of one authoring operation.
///
/// Serialized with an `operation` tag so the UI layer can send
/// `{"operation": "rewrite", "text": "...", "tone": "poetic"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum OperationInput {
    Synopsis {
        keywords: Vec<String>,
    },
    ChapterTitles {
        text: String,
    },
    Rewrite {
        text: String,
        #[serde(default)]
        tone: Tone,
    },
    PlotTwists {
        text: String,
    },
    CharacterCheck {
        text: String,
        #[serde(default)]
        profile: String,
    },
    Hashtags {
        text: String,
    },
    Genres {
        text: String,
    },
    Moderate {
        text: String,
    },
    Summary {
        text: String,
    },
    FastRecap {
        text: String,
    },
}

impl OperationInput {
    /// The operation this input belongs to.
    pub fn operation(&self) -> Operation {
        match self {
            Self::Synopsis { .. } => Operation::Synopsis,
            Self::ChapterTitles { .. } => Operation::ChapterTitles,
            Self::Rewrite { .. } => Operation::Rewrite,
            Self::PlotTwists { .. } => Operation::PlotTwists,
            Self::CharacterCheck { .. } => Operation::CharacterCheck,
            Self::Hashtags { .. } => Operation::Hashtags,
            Self::Genres { .. } => Operation::Genres,
            Self::Moderate { .. } => Operation::Moderate,
            Self::Summary { .. } => Operation::Summary,
            Self::FastRecap { .. } => Operation::FastRecap,
        }
    }

    /// The main text field, or the joined keywords for synopsis.
    pub fn text(&self) -> String {
        match self {
            Self::Synopsis { keywords } => keywords.join(", "),
            Self::ChapterTitles { text }
            | Self::Rewrite { text, .. }
            | Self::PlotTwists { text }
            | Self::CharacterCheck { text, .. }
            | Self::Hashtags { text }
            | Self::Genres { text }
            | Self::Moderate { text }
            | Self::Summary { text }
            | Self::FastRecap { text } => text.clone(),
        }
    }

    /// Text the language detector looks at.
    pub fn language_sample(&self) -> String {
        match self {
            Self::CharacterCheck { text, profile } => format!("{} {}", text, profile),
            _ => self.text(),
        }
    }

    /// Reject inputs that indicate a caller programming error and normalize
    /// the rest.
    pub fn validate(self) -> Result<Self, AssistError> {
        match self {
            Self::Synopsis { keywords } => {
                let keywords: Vec<String> = keywords
                    .into_iter()
                    .map(|k| k.trim().to_string())
                    .filter(|k| !k.is_empty())
                    .collect();
                if keywords.is_empty() {
                    return Err(AssistError::InvalidInput(
                        "synopsis needs at least one keyword".to_string(),
                    ));
                }
                Ok(Self::Synopsis { keywords })
            }
            Self::Rewrite { text, tone } => {
                if text.trim().is_empty() {
                    return Err(AssistError::InvalidInput(
                        "rewrite needs non-empty text".to_string(),
                    ));
                }
                Ok(Self::Rewrite { text, tone })
            }
            other => Ok(other),
        }
    }
}

/// Split a free-form keyword string on commas and semicolons.
///
/// Keeps at most [`MAX_KEYWORDS`] non-empty, trimmed keywords.
pub fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split([',', ';'])
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .take(MAX_KEYWORDS)
        .map(str::to_string)
        .collect()
}

/// Per-call options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvokeOptions {
    /// Language choice; `None` uses the assistant's configured default.
    pub language: Option<LanguageChoice>,
}

impl InvokeOptions {
    /// Detect the language from the input.
    pub fn auto() -> Self {
        Self {
            language: Some(LanguageChoice::Auto),
        }
    }

    /// Pin the language.
    pub fn language(language: impl Into<LanguageChoice>) -> Self {
        Self {
            language: Some(language.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use story_core::Language;

    #[test]
    fn test_parse_keywords() {
        assert_eq!(parse_keywords("dragon, exile;revenge"), vec!["dragon", "exile", "revenge"]);
        assert_eq!(parse_keywords(" , ;"), Vec::<String>::new());
        assert_eq!(parse_keywords("a,b,c,d,e,f,g").len(), MAX_KEYWORDS);
    }

    #[test]
    fn test_synopsis_requires_keywords() {
        let input = OperationInput::Synopsis {
            keywords: vec!["  ".to_string()],
        };
        assert!(matches!(input.validate(), Err(AssistError::InvalidInput(_))));

        let input = OperationInput::Synopsis {
            keywords: vec![" dragon ".to_string(), "".to_string()],
        };
        assert_eq!(
            input.validate().unwrap(),
            OperationInput::Synopsis {
                keywords: vec!["dragon".to_string()]
            }
        );
    }

    #[test]
    fn test_rewrite_requires_text() {
        let input = OperationInput::Rewrite {
            text: " ".to_string(),
            tone: Tone::Soft,
        };
        assert!(input.validate().unwrap_err().is_caller_error());
    }

    #[test]
    fn test_empty_text_is_valid_for_other_operations() {
        let input = OperationInput::Summary {
            text: String::new(),
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_character_check_sample_includes_profile() {
        let input = OperationInput::CharacterCheck {
            text: "He runs away".to_string(),
            profile: "dũng cảm".to_string(),
        };
        assert_eq!(input.language_sample(), "He runs away dũng cảm");
        assert_eq!(input.operation(), Operation::CharacterCheck);
    }

    #[test]
    fn test_deserialize_tagged_input() {
        let input: OperationInput = serde_json::from_str(
            r#"{"operation": "rewrite", "text": "It rained.", "tone": "poetic"}"#,
        )
        .unwrap();
        assert_eq!(
            input,
            OperationInput::Rewrite {
                text: "It rained.".to_string(),
                tone: Tone::Poetic
            }
        );

        let input: OperationInput =
            serde_json::from_str(r#"{"operation": "fastRecap", "text": "x"}"#).unwrap();
        assert_eq!(input.operation(), Operation::FastRecap);
    }

    #[test]
    fn test_invoke_options() {
        assert_eq!(InvokeOptions::default().language, None);
        assert_eq!(InvokeOptions::auto().language, Some(LanguageChoice::Auto));
        assert_eq!(
            InvokeOptions::language(Language::Vi).language,
            Some(LanguageChoice::Pinned(Language::Vi))
        );
    }
}
