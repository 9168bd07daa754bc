//! Operation payloads and their structural contract.

use serde::{Deserialize, Serialize};
use story_core::Operation;

use crate::moderation::{ModerationVerdict, RiskTier};

/// One character-consistency finding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterIssue {
    /// Where in the text the problem appears.
    #[serde(default)]
    pub location: String,
    /// Why the behaviour contradicts the profile.
    #[serde(default)]
    pub reason: String,
    /// Suggested correction.
    #[serde(default)]
    pub fix: String,
}

/// The result of one operation.
///
/// Serializes to the bare payload object, e.g. `{"titles": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Synopsis { synopsis: String },
    ChapterTitles { titles: Vec<String> },
    Rewrite { rewritten: String },
    PlotTwists { twists: Vec<String> },
    CharacterCheck { issues: Vec<CharacterIssue> },
    Hashtags { tags: Vec<String> },
    Genres { genres: Vec<String> },
    Moderate(ModerationVerdict),
    Summary { summary: String },
    FastRecap { bullets: Vec<String> },
}

impl Payload {
    /// The operation that produces this payload.
    pub fn operation(&self) -> Operation {
        match self {
            Self::Synopsis { .. } => Operation::Synopsis,
            Self::ChapterTitles { .. } => Operation::ChapterTitles,
            Self::Rewrite { .. } => Operation::Rewrite,
            Self::PlotTwists { .. } => Operation::PlotTwists,
            Self::CharacterCheck { .. } => Operation::CharacterCheck,
            Self::Hashtags { .. } => Operation::Hashtags,
            Self::Genres { .. } => Operation::Genres,
            Self::Moderate(_) => Operation::Moderate,
            Self::Summary { .. } => Operation::Summary,
            Self::FastRecap { .. } => Operation::FastRecap,
        }
    }

    /// Check the structural contract shared by model and fallback payloads:
    /// required text is non-empty and lists stay within the operation bounds.
    pub fn satisfies_contract(&self) -> bool {
        match self {
            Self::Synopsis { synopsis: text }
            | Self::Rewrite { rewritten: text }
            | Self::Summary { summary: text } => !text.trim().is_empty(),
            Self::ChapterTitles { titles: items }
            | Self::PlotTwists { twists: items }
            | Self::Genres { genres: items }
            | Self::FastRecap { bullets: items } => {
                list_within_bounds(items, self.operation().max_items())
            }
            Self::Hashtags { tags } => {
                list_within_bounds(tags, self.operation().max_items())
                    && tags.iter().all(|t| {
                        t.starts_with('#') && t.chars().count() > 1 && !t.contains(char::is_whitespace)
                    })
            }
            Self::CharacterCheck { issues } => issues.iter().all(|i| !i.reason.trim().is_empty()),
            Self::Moderate(verdict) => {
                verdict.risk == RiskTier::from_issues(&verdict.issues)
                    && !verdict.recommended_fix.trim().is_empty()
            }
        }
    }

    /// Text of a free-text payload; empty for other shapes.
    pub fn into_text(self) -> String {
        match self {
            Self::Synopsis { synopsis: text }
            | Self::Rewrite { rewritten: text }
            | Self::Summary { summary: text } => text,
            _ => String::new(),
        }
    }

    /// Items of a list payload; empty for other shapes.
    pub fn into_list(self) -> Vec<String> {
        match self {
            Self::ChapterTitles { titles: items }
            | Self::PlotTwists { twists: items }
            | Self::Hashtags { tags: items }
            | Self::Genres { genres: items }
            | Self::FastRecap { bullets: items } => items,
            _ => Vec::new(),
        }
    }

    /// Issues of a character-check payload; empty for other shapes.
    pub fn into_character_issues(self) -> Vec<CharacterIssue> {
        match self {
            Self::CharacterCheck { issues } => issues,
            _ => Vec::new(),
        }
    }

    /// Verdict of a moderation payload.
    pub fn into_verdict(self) -> Option<ModerationVerdict> {
        match self {
            Self::Moderate(verdict) => Some(verdict),
            _ => None,
        }
    }
}

fn list_within_bounds(items: &[String], max: Option<usize>) -> bool {
    !items.is_empty()
        && max.map_or(true, |m| items.len() <= m)
        && items.iter().all(|i| !i.trim().is_empty())
}

/// Combined genre and hashtag suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSummary {
    /// Primary genre.
    pub genre: String,
    /// Hashtags.
    pub tags: Vec<String>,
}
