//! Rule-based moderation scoring.
//!
//! The scorer flags categories of concern by keyword matching and derives a
//! risk tier from the set of flagged categories. It is advisory: lists are
//! broad and every language's lists are scanned for every text, so it errs
//! toward false positives and leaves the final call to human review.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use story_core::{normalize_text, Language};

/// A category of moderation concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    OffensiveLanguage,
    Violence,
    SexualContent,
    SexualContentInvolvingMinors,
    HateSpeech,
    PoliticalContent,
}

impl IssueKind {
    /// Wire name of the issue kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OffensiveLanguage => "offensive_language",
            Self::Violence => "violence",
            Self::SexualContent => "sexual_content",
            Self::SexualContentInvolvingMinors => "sexual_content_involving_minors",
            Self::HateSpeech => "hate_speech",
            Self::PoliticalContent => "political_content",
        }
    }
}

/// Risk tier derived from the flagged issue kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// `High` if minors are involved or three or more kinds are flagged,
    /// `Medium` for exactly two kinds, `Low` otherwise.
    pub fn from_issues(issues: &BTreeSet<IssueKind>) -> Self {
        if issues.contains(&IssueKind::SexualContentInvolvingMinors) || issues.len() >= 3 {
            Self::High
        } else if issues.len() == 2 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Outcome of moderating one text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationVerdict {
    /// Flagged issue kinds.
    pub issues: BTreeSet<IssueKind>,
    /// Risk tier, always `RiskTier::from_issues(&issues)`.
    pub risk: RiskTier,
    /// Suggested safe rewrite or guidance.
    pub recommended_fix: String,
}

impl ModerationVerdict {
    /// Check whether nothing was flagged.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Word lists for one issue kind.
struct CategoryRule {
    kind: IssueKind,
    en: &'static [&'static str],
    vi: &'static [&'static str],
}

impl CategoryRule {
    fn terms(&self, language: Language) -> &'static [&'static str] {
        match language {
            Language::En => self.en,
            Language::Vi => self.vi,
        }
    }
}

const RULES: &[CategoryRule] = &[
    CategoryRule {
        kind: IssueKind::OffensiveLanguage,
        en: &["fuck", "shit", "bitch", "asshole", "damn", "bastard"],
        vi: &["đụ", "đcm", "đm", "địt", "đĩ", "vcl"],
    },
    CategoryRule {
        kind: IssueKind::Violence,
        en: &["kill", "murder", "blood", "slaughter", "violence", "beat", "stab", "torture"],
        vi: &["giết", "máu", "đánh", "hành hung", "thảm sát"],
    },
    CategoryRule {
        kind: IssueKind::SexualContent,
        en: &["sex", "rape", "incest", "porn", "nude"],
        vi: &["tình dục", "hiếp dâm", "ấu dâm", "khiêu dâm"],
    },
    CategoryRule {
        kind: IssueKind::SexualContentInvolvingMinors,
        en: &["minor", "underage", "pedophil"],
        vi: &["trẻ em", "vị thành niên", "ấu dâm"],
    },
    CategoryRule {
        kind: IssueKind::HateSpeech,
        en: &["hate", "nazi", "racist", "supremacy", "bigot"],
        vi: &["phân biệt chủng tộc", "kỳ thị", "thù ghét"],
    },
    CategoryRule {
        kind: IssueKind::PoliticalContent,
        en: &["election", "government", "vote", "president", "parliament"],
        vi: &["chính phủ", "bầu cử", "chính trị"],
    },
];

/// Localized guidance used when no model rewrite is available.
pub fn fallback_fix(language: Language) -> &'static str {
    match language {
        Language::En => "Rewrite to remove explicit or sensitive content and offensive language.",
        Language::Vi => "Hãy viết lại để loại bỏ nội dung nhạy cảm và từ ngữ tục tĩu.",
    }
}

/// Localized note for a text with nothing flagged.
pub fn no_issues_note(language: Language) -> &'static str {
    match language {
        Language::En => "No issues detected.",
        Language::Vi => "Không phát hiện vấn đề rõ ràng.",
    }
}

/// Keyword-based moderation scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModerationScorer;

impl ModerationScorer {
    /// Create a new scorer.
    pub fn new() -> Self {
        Self
    }

    /// Flag issue kinds in `text`.
    ///
    /// Each kind is flagged at most once regardless of how many of its terms
    /// match.
    pub fn score(&self, text: &str) -> BTreeSet<IssueKind> {
        let haystack = normalize_text(text);

        RULES
            .iter()
            .filter(|rule| {
                Language::ALL
                    .iter()
                    .flat_map(|lang| rule.terms(*lang))
                    .any(|term| contains_term(&haystack, term))
            })
            .map(|rule| rule.kind)
            .collect()
    }

    /// Rule-based verdict with the fixed localized guidance.
    pub fn moderate(&self, text: &str, language: Language) -> ModerationVerdict {
        let issues = self.score(text);
        let recommended_fix = if issues.is_empty() {
            no_issues_note(language)
        } else {
            fallback_fix(language)
        };

        ModerationVerdict {
            risk: RiskTier::from_issues(&issues),
            issues,
            recommended_fix: recommended_fix.to_string(),
        }
    }
}

/// Check whether `term` occurs in `haystack` at the start of a word.
///
/// `kill` matches "killed", while `vote` does not match "devoted".
fn contains_term(haystack: &str, term: &str) -> bool {
    haystack.match_indices(term).any(|(idx, _)| {
        haystack[..idx]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric())
    })
}
