//! Prompt templates for every operation, in English and Vietnamese.

use story_core::{excerpt, Language, Operation, Tone};

use crate::input::OperationInput;

/// Maximum profile characters embedded in a character-check prompt.
pub const PROFILE_EXCERPT_CHARS: usize = 1000;

/// Answer shape requested from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputShape {
    FreeText,
    List,
    Json,
}

/// A prompt ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    pub text: String,
    /// Ask for a JSON answer.
    pub structured: bool,
}

impl RenderedPrompt {
    fn new(text: String, shape: OutputShape) -> Self {
        Self {
            text,
            structured: shape == OutputShape::Json,
        }
    }
}

/// Answer shape of an operation.
pub fn shape(operation: Operation) -> OutputShape {
    match operation {
        Operation::Synopsis | Operation::Rewrite | Operation::Summary => OutputShape::FreeText,
        Operation::ChapterTitles
        | Operation::PlotTwists
        | Operation::Hashtags
        | Operation::FastRecap => OutputShape::List,
        Operation::CharacterCheck | Operation::Genres | Operation::Moderate => OutputShape::Json,
    }
}

/// Maximum characters of user text embedded in the prompt.
///
/// For moderation this bounds the text sent for a safe rewrite.
pub fn excerpt_limit(operation: Operation) -> Option<usize> {
    match operation {
        Operation::Synopsis => None,
        Operation::ChapterTitles | Operation::PlotTwists | Operation::FastRecap => Some(2000),
        Operation::CharacterCheck => Some(2000),
        Operation::Rewrite | Operation::Summary => Some(4000),
        Operation::Hashtags | Operation::Genres => Some(1200),
        Operation::Moderate => Some(400),
    }
}

/// Render the prompt for `input` in `language`.
pub fn render(input: &OperationInput, language: Language) -> RenderedPrompt {
    let operation = input.operation();
    let limit = excerpt_limit(operation).unwrap_or(usize::MAX);
    let vi = language == Language::Vi;

    let text = match input {
        OperationInput::Synopsis { keywords } => {
            let joined = keywords.join(", ");
            if vi {
                format!(
                    "Viết một đoạn tóm tắt truyện ngắn (3-4 câu) dựa trên các từ khóa sau: {}. \
                     Chỉ trả về đoạn tóm tắt.",
                    joined
                )
            } else {
                format!(
                    "Write a short story synopsis (3-4 sentences) based on these keywords: {}. \
                     Return only the synopsis.",
                    joined
                )
            }
        }
        OperationInput::ChapterTitles { text } => {
            let body = excerpt(text, limit);
            if vi {
                format!(
                    "Đề xuất tối đa 5 tiêu đề chương hấp dẫn cho nội dung dưới đây. \
                     Mỗi tiêu đề một dòng, không đánh số, không giải thích.\n\nNội dung:\n{}",
                    body
                )
            } else {
                format!(
                    "Suggest up to 5 compelling chapter titles for the text below. \
                     One title per line, no numbering, no explanations.\n\nText:\n{}",
                    body
                )
            }
        }
        OperationInput::Rewrite { text, tone } => render_rewrite(excerpt(text, limit), *tone, language),
        OperationInput::PlotTwists { text } => {
            let body = excerpt(text, limit);
            if vi {
                format!(
                    "Đề xuất 3 tình tiết bất ngờ cho câu chuyện dưới đây, từ tinh tế đến kịch tính. \
                     Mỗi tình tiết một dòng, ngắn gọn.\n\nNội dung:\n{}",
                    body
                )
            } else {
                format!(
                    "Suggest 3 plot twists for the story below, ordered from subtle to dramatic. \
                     One twist per line, keep each short.\n\nText:\n{}",
                    body
                )
            }
        }
        OperationInput::CharacterCheck { text, profile } => {
            let body = excerpt(text, limit);
            let profile = excerpt(profile, PROFILE_EXCERPT_CHARS);
            if vi {
                format!(
                    "Kiểm tra xem hành động của nhân vật trong đoạn văn có mâu thuẫn với hồ sơ nhân vật không. \
                     Trả về JSON dạng {{\"issues\": [{{\"location\": \"...\", \"reason\": \"...\", \"fix\": \"...\"}}]}}. \
                     Nếu không có mâu thuẫn, trả về {{\"issues\": []}}.\n\n\
                     Hồ sơ nhân vật:\n{}\n\nNội dung:\n{}",
                    profile, body
                )
            } else {
                format!(
                    "Check whether the character's actions in the text contradict the character profile. \
                     Return JSON shaped like {{\"issues\": [{{\"location\": \"...\", \"reason\": \"...\", \"fix\": \"...\"}}]}}. \
                     If there are no contradictions, return {{\"issues\": []}}.\n\n\
                     Character profile:\n{}\n\nText:\n{}",
                    profile, body
                )
            }
        }
        OperationInput::Hashtags { text } => {
            let body = excerpt(text, limit);
            if vi {
                format!(
                    "Đề xuất tối đa 15 hashtag phù hợp cho câu chuyện dưới đây. \
                     Trả về các hashtag cách nhau bởi dấu phẩy, mỗi hashtag bắt đầu bằng #.\n\nNội dung:\n{}",
                    body
                )
            } else {
                format!(
                    "Suggest up to 15 relevant hashtags for the story below. \
                     Return them comma-separated, each starting with #.\n\nText:\n{}",
                    body
                )
            }
        }
        OperationInput::Genres { text } => {
            let body = excerpt(text, limit);
            if vi {
                format!(
                    "Xác định tối đa 3 thể loại phù hợp nhất cho câu chuyện dưới đây. \
                     Trả về một mảng JSON các chuỗi, ví dụ [\"Kỳ ảo\", \"Phiêu lưu\"].\n\nNội dung:\n{}",
                    body
                )
            } else {
                format!(
                    "Identify up to 3 genres that best fit the story below. \
                     Return a JSON array of strings, for example [\"Fantasy\", \"Adventure\"].\n\nText:\n{}",
                    body
                )
            }
        }
        OperationInput::Moderate { text } => render_fix(excerpt(text, limit), language),
        OperationInput::Summary { text } => {
            let body = excerpt(text, limit);
            if vi {
                format!(
                    "Tóm tắt câu chuyện dưới đây trong 3-5 câu, giữ các sự kiện chính. \
                     Chỉ trả về đoạn tóm tắt.\n\nNội dung:\n{}",
                    body
                )
            } else {
                format!(
                    "Summarize the story below in 3-5 sentences, keeping the key events. \
                     Return only the summary.\n\nText:\n{}",
                    body
                )
            }
        }
        OperationInput::FastRecap { text } => {
            let body = excerpt(text, limit);
            if vi {
                format!(
                    "Tóm tắt nhanh các sự kiện chính của đoạn truyện dưới đây thành 3-6 ý ngắn. \
                     Mỗi ý một dòng.\n\nNội dung:\n{}",
                    body
                )
            } else {
                format!(
                    "Recap the key events of the passage below as 3-6 short bullet points. \
                     One point per line.\n\nText:\n{}",
                    body
                )
            }
        }
    };

    RenderedPrompt::new(text, shape(operation))
}

fn render_rewrite(body: &str, tone: Tone, language: Language) -> String {
    let label = tone.label(language);
    match language {
        Language::Vi => format!(
            "Viết lại đoạn văn dưới đây với giọng văn {}, giữ nguyên ý nghĩa và ngôn ngữ gốc. \
             Chỉ trả về đoạn văn đã viết lại.\n\nNội dung:\n{}",
            label, body
        ),
        Language::En => format!(
            "Rewrite the passage below in a {} tone, preserving its meaning and language. \
             Return only the rewritten passage.\n\nText:\n{}",
            label, body
        ),
    }
}

fn render_fix(body: &str, language: Language) -> String {
    match language {
        Language::Vi => format!(
            "Đoạn văn dưới đây có thể chứa nội dung nhạy cảm. Hãy viết lại một phiên bản an toàn, \
             giữ ý chính. Trả về JSON dạng {{\"fix\": \"...\"}}.\n\nNội dung:\n{}",
            body
        ),
        Language::En => format!(
            "The passage below may contain sensitive content. Write a safe version that keeps \
             the main idea. Return JSON shaped like {{\"fix\": \"...\"}}.\n\nText:\n{}",
            body
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shapes() {
        assert_eq!(shape(Operation::Synopsis), OutputShape::FreeText);
        assert_eq!(shape(Operation::Hashtags), OutputShape::List);
        assert_eq!(shape(Operation::Genres), OutputShape::Json);

        let structured: Vec<Operation> = Operation::ALL
            .into_iter()
            .filter(|op| shape(*op) == OutputShape::Json)
            .collect();
        assert_eq!(
            structured,
            vec![Operation::CharacterCheck, Operation::Genres, Operation::Moderate]
        );
    }

    #[test]
    fn test_render_synopsis() {
        let input = OperationInput::Synopsis {
            keywords: vec!["dragon".into(), "exile".into()],
        };
        let prompt = render(&input, Language::En);
        assert!(prompt.text.contains("dragon, exile"));
        assert!(!prompt.structured);

        let prompt = render(&input, Language::Vi);
        assert!(prompt.text.contains("từ khóa"));
    }

    #[test]
    fn test_excerpt_is_bounded() {
        let text = "ạ".repeat(5000);
        let input = OperationInput::Hashtags { text };
        let prompt = render(&input, Language::Vi);
        assert_eq!(prompt.text.matches('ạ').count(), 1200);
    }

    #[test]
    fn test_character_check_bounds_profile() {
        let input = OperationInput::CharacterCheck {
            text: "§".repeat(3000),
            profile: "¶".repeat(1500),
        };
        let prompt = render(&input, Language::En);
        assert!(prompt.structured);
        assert_eq!(prompt.text.matches('§').count(), 2000);
        assert_eq!(prompt.text.matches('¶').count(), PROFILE_EXCERPT_CHARS);
    }

    #[test]
    fn test_rewrite_uses_tone_label() {
        let input = OperationInput::Rewrite {
            text: "It rained.".into(),
            tone: Tone::Poetic,
        };
        assert!(render(&input, Language::Vi).text.contains("trữ tình"));
        assert!(render(&input, Language::En).text.contains("poetic"));
    }

    #[test]
    fn test_moderate_renders_fix_prompt() {
        let input = OperationInput::Moderate {
            text: "¤".repeat(1000),
        };
        let prompt = render(&input, Language::En);
        assert!(prompt.structured);
        assert!(prompt.text.contains("\"fix\""));
        assert_eq!(prompt.text.matches('¤').count(), 400);
    }

    #[test]
    fn test_every_operation_renders_in_both_languages() {
        for language in Language::ALL {
            let inputs = [
                OperationInput::Synopsis { keywords: vec!["k".into()] },
                OperationInput::ChapterTitles { text: "t".into() },
                OperationInput::Rewrite { text: "t".into(), tone: Tone::Action },
                OperationInput::PlotTwists { text: "t".into() },
                OperationInput::CharacterCheck { text: "t".into(), profile: String::new() },
                OperationInput::Hashtags { text: "t".into() },
                OperationInput::Genres { text: "t".into() },
                OperationInput::Moderate { text: "t".into() },
                OperationInput::Summary { text: "t".into() },
                OperationInput::FastRecap { text: "t".into() },
            ];
            for input in inputs {
                let prompt = render(&input, language);
                assert!(!prompt.text.is_empty());
                assert_eq!(prompt.structured, shape(input.operation()) == OutputShape::Json);
            }
        }
    }
}
