//! Deterministic offline answers.
//!
//! Every operation has a heuristic answer that needs no I/O and satisfies the
//! same payload contract as a parsed model answer, including on empty input.

use story_core::{excerpt, normalize_text, Language};

use crate::input::OperationInput;
use crate::moderation::ModerationScorer;
use crate::payload::{CharacterIssue, Payload};

const TITLE_SNIPPET_CHARS: usize = 60;
const SUMMARY_SENTENCES: usize = 3;
const RECAP_SENTENCES: usize = 4;
const RECAP_BULLET_CHARS: usize = 140;

/// Produces heuristic payloads when the model cannot.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackEngine {
    scorer: ModerationScorer,
}

impl FallbackEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Heuristic payload for `input` in `language`.
    pub fn fallback(&self, input: &OperationInput, language: Language) -> Payload {
        let vi = language == Language::Vi;

        match input {
            OperationInput::Synopsis { keywords } => Payload::Synopsis {
                synopsis: synopsis(keywords, language),
            },
            OperationInput::ChapterTitles { text } => Payload::ChapterTitles {
                titles: chapter_titles(text, language),
            },
            OperationInput::Rewrite { text, .. } => Payload::Rewrite {
                rewritten: if text.trim().is_empty() {
                    "…".to_string()
                } else {
                    text.clone()
                },
            },
            OperationInput::PlotTwists { .. } => Payload::PlotTwists {
                twists: owned(if vi {
                    &[
                        "Kẻ thân thiết phản bội",
                        "Người bị cho là an toàn thực ra là kẻ chủ mưu",
                        "Sự thật lớn hé lộ khiến mọi thứ thay đổi",
                    ]
                } else {
                    &[
                        "A trusted ally betrays",
                        "The assumed-safe character is the mastermind",
                        "A hidden truth changes everything",
                    ]
                }),
            },
            OperationInput::CharacterCheck { text, profile } => Payload::CharacterCheck {
                issues: character_issues(text, profile, language),
            },
            OperationInput::Hashtags { .. } => Payload::Hashtags {
                tags: owned(if vi {
                    &["#truyện", "#hưcấu", "#nhânvật", "#cốttruyện", "#cảmxúc"]
                } else {
                    &["#story", "#fiction", "#characters", "#plot", "#mood"]
                }),
            },
            OperationInput::Genres { text } => Payload::Genres {
                genres: vec![guess_genre(text, language).to_string()],
            },
            OperationInput::Moderate { text } => Payload::Moderate(self.scorer.moderate(text, language)),
            OperationInput::Summary { text } => Payload::Summary {
                summary: summary(text, language),
            },
            OperationInput::FastRecap { text } => Payload::FastRecap {
                bullets: fast_recap(text, language),
            },
        }
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn synopsis(keywords: &[String], language: Language) -> String {
    let joined = keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    match (language, joined.is_empty()) {
        (Language::En, false) => format!(
            "A story about {}, highlighting key events and emotions.",
            joined
        ),
        (Language::Vi, false) => format!(
            "Câu chuyện về {}, với các sự kiện và cảm xúc nổi bật.",
            joined
        ),
        (Language::En, true) => "A story highlighting key events and emotions.".to_string(),
        (Language::Vi, true) => "Một câu chuyện với các sự kiện và cảm xúc nổi bật.".to_string(),
    }
}

fn chapter_titles(text: &str, language: Language) -> Vec<String> {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let snippet = excerpt(&collapsed, TITLE_SNIPPET_CHARS).trim_end();

    let (intro, turn, climax, first) = match language {
        Language::En => ("Intro", "Turning Point", "Climax", "Chapter 1"),
        Language::Vi => ("Khởi đầu", "Bước ngoặt", "Cao trào", "Chương 1"),
    };
    let snippet = if snippet.is_empty() { first } else { snippet };

    vec![
        format!("{} ({})", snippet, intro),
        turn.to_string(),
        climax.to_string(),
    ]
}

fn character_issues(text: &str, profile: &str, language: Language) -> Vec<CharacterIssue> {
    let profile = normalize_text(profile);
    let text = normalize_text(text);

    let brave = ["brave", "dũng cảm"].iter().any(|w| profile.contains(w));
    let flees = ["runs away", "ran away", "bỏ chạy"]
        .iter()
        .any(|w| text.contains(w));
    if !(brave && flees) {
        return Vec::new();
    }

    let (location, reason, fix) = match language {
        Language::En => (
            "chapter mismatch",
            "Brave character flees",
            "Show hesitant behavior instead of fleeing completely",
        ),
        Language::Vi => (
            "đoạn không khớp",
            "Nhân vật dũng cảm lại bỏ chạy",
            "Thể hiện sự do dự thay vì bỏ chạy hoàn toàn",
        ),
    };

    vec![CharacterIssue {
        location: location.to_string(),
        reason: reason.to_string(),
        fix: fix.to_string(),
    }]
}

fn guess_genre(text: &str, language: Language) -> &'static str {
    let text = normalize_text(text);
    let romance = text.contains("love") || text.contains("yêu");
    match (language, romance) {
        (Language::En, true) => "Romance",
        (Language::En, false) => "Fantasy",
        (Language::Vi, true) => "Lãng mạn",
        (Language::Vi, false) => "Kỳ ảo",
    }
}

fn summary(text: &str, language: Language) -> String {
    let sentences = split_sentences(text);
    if sentences.is_empty() {
        return match language {
            Language::En => "Concise story summary.".to_string(),
            Language::Vi => "Tóm tắt truyện ngắn gọn.".to_string(),
        };
    }
    sentences
        .into_iter()
        .take(SUMMARY_SENTENCES)
        .collect::<Vec<_>>()
        .join(" ")
}

fn fast_recap(text: &str, language: Language) -> Vec<String> {
    let bullets: Vec<String> = split_sentences(text)
        .into_iter()
        .take(RECAP_SENTENCES)
        .map(|s| cap_chars(&s, RECAP_BULLET_CHARS))
        .collect();

    if !bullets.is_empty() {
        return bullets;
    }
    match language {
        Language::En => owned(&["Event 1", "Event 2", "Event 3"]),
        Language::Vi => owned(&["Sự kiện 1", "Sự kiện 2", "Sự kiện 3"]),
    }
}

/// Shorten `text` to `max` characters, marking the cut with `...`.
fn cap_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    format!("{}...", excerpt(text, max.saturating_sub(3)))
}

/// Split on `.`, `!` or `?` followed by whitespace.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            if let Some(&(_, next)) = chars.peek() {
                if next.is_whitespace() {
                    let end = i + c.len_utf8();
                    sentences.push(text[start..end].trim().to_string());
                    start = end;
                }
            }
        }
    }
    sentences.push(text[start..].trim().to_string());

    sentences.retain(|s| !s.is_empty());
    sentences
}
