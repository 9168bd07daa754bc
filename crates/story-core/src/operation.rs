//! Authoring operations and rewrite tones.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AssistError;
use crate::language::Language;

/// One discrete authoring task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    /// Short story description from keywords.
    Synopsis,
    /// Candidate chapter titles for a passage.
    ChapterTitles,
    /// Rewrite a passage in a given tone.
    Rewrite,
    /// Plot twist suggestions consistent with a passage.
    PlotTwists,
    /// Character consistency check against a profile.
    CharacterCheck,
    /// Hashtags describing theme, characters, mood and setting.
    Hashtags,
    /// Genre suggestions.
    Genres,
    /// Rule-based moderation with a suggested safe rewrite.
    Moderate,
    /// Whole-story summary.
    Summary,
    /// Bullet recap of a chapter.
    FastRecap,
}

impl Operation {
    /// All operations, in declaration order.
    pub const ALL: [Operation; 10] = [
        Operation::Synopsis,
        Operation::ChapterTitles,
        Operation::Rewrite,
        Operation::PlotTwists,
        Operation::CharacterCheck,
        Operation::Hashtags,
        Operation::Genres,
        Operation::Moderate,
        Operation::Summary,
        Operation::FastRecap,
    ];

    /// Wire name of the operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Synopsis => "synopsis",
            Self::ChapterTitles => "chapterTitles",
            Self::Rewrite => "rewrite",
            Self::PlotTwists => "plotTwists",
            Self::CharacterCheck => "characterCheck",
            Self::Hashtags => "hashtags",
            Self::Genres => "genres",
            Self::Moderate => "moderate",
            Self::Summary => "summary",
            Self::FastRecap => "fastRecap",
        }
    }

    /// Maximum number of items in a list-shaped payload, if bounded.
    pub fn max_items(&self) -> Option<usize> {
        match self {
            Self::ChapterTitles => Some(5),
            Self::PlotTwists => Some(3),
            Self::Hashtags => Some(15),
            Self::Genres => Some(3),
            Self::FastRecap => Some(6),
            _ => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = AssistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|op| op.as_str() == s.trim())
            .copied()
            .ok_or_else(|| AssistError::InvalidInput(format!("unknown operation: {}", s)))
    }
}

/// Target tone for the rewrite operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Soft,
    Action,
    Poetic,
}

impl Tone {
    /// Localized label used inside prompts.
    pub fn label(&self, language: Language) -> &'static str {
        match (self, language) {
            (Self::Soft, Language::En) => "soft",
            (Self::Action, Language::En) => "action",
            (Self::Poetic, Language::En) => "poetic",
            (Self::Soft, Language::Vi) => "nhẹ nhàng",
            (Self::Action, Language::Vi) => "hành động",
            (Self::Poetic, Language::Vi) => "trữ tình",
        }
    }
}

impl FromStr for Tone {
    type Err = AssistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "soft" => Ok(Self::Soft),
            "action" => Ok(Self::Action),
            "poetic" => Ok(Self::Poetic),
            other => Err(AssistError::InvalidInput(format!("unknown tone: {}", other))),
        }
    }
}
