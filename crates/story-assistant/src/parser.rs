//! Parsing of raw model answers into typed payloads.
//!
//! Models rarely follow formatting instructions exactly. The parsers here
//! accept the common deviations (numbered or bulleted lists, prose around
//! JSON, markdown fences) and reject anything that does not yield a usable
//! payload with [`AssistError::Malformed`].

use serde_json::Value;
use std::collections::HashSet;
use story_core::{AssistError, Operation};

use crate::payload::{CharacterIssue, Payload};

const BULLET_CHARS: &[char] = &['-', '*', '•', '–', '—', '·'];
const QUOTE_CHARS: &[char] = &['"', '\'', '“', '”', '‘', '’', '`'];
/// Longer hashtag candidates are sentences around the tags.
const MAX_TAG_WORDS: usize = 3;

/// Parse the raw answer for `operation`.
///
/// Moderation verdicts are assembled by the assistant; use [`parse_fix`] for
/// the model part of a moderation answer.
pub fn parse(operation: Operation, raw: &str) -> Result<Payload, AssistError> {
    match operation {
        Operation::Synopsis => Ok(Payload::Synopsis {
            synopsis: parse_free_text(raw)?,
        }),
        Operation::Rewrite => Ok(Payload::Rewrite {
            rewritten: parse_free_text(raw)?,
        }),
        Operation::Summary => Ok(Payload::Summary {
            summary: parse_free_text(raw)?,
        }),
        Operation::ChapterTitles => Ok(Payload::ChapterTitles {
            titles: parse_list(raw, operation.max_items())?,
        }),
        Operation::PlotTwists => Ok(Payload::PlotTwists {
            twists: parse_list(raw, operation.max_items())?,
        }),
        Operation::FastRecap => Ok(Payload::FastRecap {
            bullets: parse_list(raw, operation.max_items())?,
        }),
        Operation::Hashtags => Ok(Payload::Hashtags {
            tags: parse_hashtags(raw, operation.max_items())?,
        }),
        Operation::CharacterCheck => Ok(Payload::CharacterCheck {
            issues: parse_character_issues(raw)?,
        }),
        Operation::Genres => Ok(Payload::Genres {
            genres: parse_genres(raw, operation.max_items())?,
        }),
        Operation::Moderate => Err(AssistError::Malformed(
            "moderation answers are parsed with parse_fix".to_string(),
        )),
    }
}

/// Parse the model's safe rewrite from a moderation answer.
///
/// Accepts `{"fix": ...}`, `{"recommended_fix": ...}`, `{"rewrite": ...}` or
/// a bare JSON string.
pub fn parse_fix(raw: &str) -> Result<String, AssistError> {
    let value = parse_json_value(raw)?;

    let fix = match &value {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => ["fix", "recommended_fix", "rewrite"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str)),
        _ => None,
    };

    match fix.map(str::trim) {
        Some(fix) if !fix.is_empty() => Ok(fix.to_string()),
        _ => Err(AssistError::Malformed("no fix in moderation answer".to_string())),
    }
}

/// Parse a free-text answer.
///
/// Strips surrounding code fences and quotes. Fails only when nothing is left.
pub fn parse_free_text(raw: &str) -> Result<String, AssistError> {
    let text = strip_wrapping_quotes(strip_code_fence(raw.trim())).trim();
    if text.is_empty() {
        return Err(AssistError::Malformed("empty answer".to_string()));
    }
    Ok(text.to_string())
}

/// Parse a list answer into at most `max` cleaned items.
pub fn parse_list(raw: &str, max: Option<usize>) -> Result<Vec<String>, AssistError> {
    let items: Vec<String> = split_candidates(raw)
        .into_iter()
        .map(|candidate| clean_item(&candidate))
        .filter(|item| !item.is_empty() && !item.ends_with(':'))
        .take(max.unwrap_or(usize::MAX))
        .collect();

    if items.is_empty() {
        return Err(AssistError::Malformed("no list items in answer".to_string()));
    }
    Ok(items)
}

/// Parse hashtags, normalized to `#Word` and deduplicated case-insensitively.
pub fn parse_hashtags(raw: &str, max: Option<usize>) -> Result<Vec<String>, AssistError> {
    let mut seen = HashSet::new();
    let tags: Vec<String> = strip_code_fence(raw.trim())
        .split(['\n', ',', ';', '#'])
        .map(clean_item)
        // Intro and closing sentences are prose, not tags.
        .filter(|item| !item.ends_with(':') && item.split_whitespace().count() <= MAX_TAG_WORDS)
        .map(|item| {
            let word: String = item
                .chars()
                .filter(|c| !c.is_whitespace() && *c != '#')
                .collect();
            word.trim_end_matches(['.', '!', '?']).to_string()
        })
        .filter(|word| !word.is_empty())
        .filter(|word| seen.insert(word.to_lowercase()))
        .take(max.unwrap_or(usize::MAX))
        .map(|word| format!("#{}", word))
        .collect();

    if tags.is_empty() {
        return Err(AssistError::Malformed("no hashtags in answer".to_string()));
    }
    Ok(tags)
}

/// Parse character-consistency findings.
///
/// Accepts `{"issues": [...]}` or a top-level array of issue objects.
pub fn parse_character_issues(raw: &str) -> Result<Vec<CharacterIssue>, AssistError> {
    let value = parse_json_value(raw)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("issues") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(AssistError::Malformed(
                    "expected an issues array".to_string(),
                ))
            }
        },
        _ => {
            return Err(AssistError::Malformed(
                "expected an issues object or array".to_string(),
            ))
        }
    };

    let mut issues = Vec::with_capacity(items.len());
    for item in items {
        let issue: CharacterIssue = serde_json::from_value(item)
            .map_err(|e| AssistError::Malformed(format!("invalid issue: {}", e)))?;
        let issue = CharacterIssue {
            location: issue.location.trim().to_string(),
            reason: issue.reason.trim().to_string(),
            fix: issue.fix.trim().to_string(),
        };
        if issue == CharacterIssue::default() {
            continue;
        }
        if issue.reason.is_empty() {
            return Err(AssistError::Malformed("issue without a reason".to_string()));
        }
        issues.push(issue);
    }
    Ok(issues)
}

/// Parse genres from a JSON array or `{"genres": [...]}`.
pub fn parse_genres(raw: &str, max: Option<usize>) -> Result<Vec<String>, AssistError> {
    let value = parse_json_value(raw)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("genres") {
            Some(Value::Array(items)) => items,
            _ => return Err(AssistError::Malformed("expected a genres array".to_string())),
        },
        _ => {
            return Err(AssistError::Malformed(
                "expected a genres array".to_string(),
            ))
        }
    };

    let mut seen = HashSet::new();
    let mut genres = Vec::new();
    for item in items {
        let Value::String(genre) = item else {
            return Err(AssistError::Malformed("genre is not a string".to_string()));
        };
        let genre = genre.trim();
        if !genre.is_empty() && seen.insert(genre.to_lowercase()) {
            genres.push(genre.to_string());
        }
    }
    genres.truncate(max.unwrap_or(usize::MAX));

    if genres.is_empty() {
        return Err(AssistError::Malformed("no genres in answer".to_string()));
    }
    Ok(genres)
}

fn parse_json_value(raw: &str) -> Result<Value, AssistError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AssistError::Malformed("empty answer".to_string()));
    }
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }
    serde_json::from_str(extract_json(trimmed))
        .map_err(|e| AssistError::Malformed(format!("invalid JSON: {}", e)))
}

/// Extract the JSON value from an answer that may wrap it in prose or a
/// markdown code block.
pub fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();

    if trimmed.starts_with(['{', '[']) {
        return extract_balanced_json(trimmed);
    }

    if let Some(start) = trimmed.find("```json") {
        let json_start = start + 7;
        if let Some(end) = trimmed[json_start..].find("```") {
            return extract_balanced_json(trimmed[json_start..json_start + end].trim());
        }
    }

    if let Some(start) = trimmed.find("```") {
        let after_backticks = &trimmed[start + 3..];
        let json_start = after_backticks.find('\n').map(|i| i + 1).unwrap_or(0);
        if let Some(end) = after_backticks[json_start..].find("```") {
            return extract_balanced_json(after_backticks[json_start..json_start + end].trim());
        }
    }

    if let Some(start) = trimmed.find(['{', '[']) {
        return extract_balanced_json(&trimmed[start..]);
    }

    trimmed
}

/// Cut a string starting with `{` or `[` at its matching closing bracket.
///
/// Drops trailing junk such as `{"issues": []}}}` -> `{"issues": []}`.
fn extract_balanced_json(s: &str) -> &str {
    let (open, close) = match s.chars().next() {
        Some('{') => ('{', '}'),
        Some('[') => ('[', ']'),
        _ => return s,
    };

    let mut depth = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in s.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return &s[..=i];
                }
            }
            _ => {}
        }
    }

    s
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Skip the language tag line if there is one.
    let body = match rest.find('\n') {
        Some(i) => &rest[i + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn strip_wrapping_quotes(text: &str) -> &str {
    let mut chars = text.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if QUOTE_CHARS.contains(&first) && QUOTE_CHARS.contains(&last) => {
            let inner = &text[first.len_utf8()..text.len() - last.len_utf8()];
            // Dialogue like `"Run," she said. "Now."` keeps its quotes.
            if inner.contains([first, last]) {
                text
            } else {
                inner
            }
        }
        _ => text,
    }
}

/// Split a list answer into raw candidates.
///
/// Intro lines ending in `:` are dropped first. Several content lines split
/// on lines; a lone content line splits on inline numbering, then inline
/// bullets, then `;`, then `,`.
fn split_candidates(raw: &str) -> Vec<String> {
    let lines: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("```") && !line.ends_with(':'))
        .collect();

    if lines.len() != 1 {
        return lines.into_iter().map(str::to_string).collect();
    }

    let line = lines[0];
    let numbers = inline_number_marks(line);
    if numbers.len() >= 2 {
        return split_at_marks(line, numbers);
    }

    let bullets = inline_bullet_marks(line);
    if bullets.len() >= 2 || bullets.first() == Some(&0) {
        return split_at_marks(line, bullets);
    }

    let separator = if line.contains(';') { ';' } else { ',' };
    line.split(separator).map(str::to_string).collect()
}

fn split_at_marks(line: &str, mut bounds: Vec<usize>) -> Vec<String> {
    if bounds.first() != Some(&0) {
        bounds.insert(0, 0);
    }
    bounds.push(line.len());
    bounds
        .windows(2)
        .map(|w| line[w[0]..w[1]].to_string())
        .collect()
}

/// Byte offsets of bullet characters standing alone between spaces, or
/// opening the line.
fn inline_bullet_marks(line: &str) -> Vec<usize> {
    let mut marks = Vec::new();
    let mut previous: Option<char> = None;
    let mut chars = line.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let spaced_before = previous.map_or(true, char::is_whitespace);
        let spaced_after = chars.peek().is_some_and(|(_, next)| next.is_whitespace());
        if BULLET_CHARS.contains(&c) && spaced_before && spaced_after {
            marks.push(i);
        }
        previous = Some(c);
    }

    marks
}

/// Byte offsets of `1. ` / `2) ` style markers that start a word.
fn inline_number_marks(line: &str) -> Vec<usize> {
    let bytes = line.as_bytes();
    let mut marks = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let at_word_start = i == 0 || bytes[i - 1].is_ascii_whitespace();
        if at_word_start && bytes[i].is_ascii_digit() {
            if let Some(end) = number_marker_end(&bytes[i..]) {
                marks.push(i);
                i += end;
                continue;
            }
        }
        i += 1;
    }

    marks
}

/// Length of a `12.` / `3)` marker followed by whitespace, if `bytes` starts
/// with one.
fn number_marker_end(bytes: &[u8]) -> Option<usize> {
    let digits = bytes
        .iter()
        .take(3)
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 || digits > 2 {
        return None;
    }
    match (bytes.get(digits), bytes.get(digits + 1)) {
        (Some(b'.') | Some(b')'), Some(next)) if next.is_ascii_whitespace() => Some(digits + 1),
        _ => None,
    }
}

/// Strip bullets, numbering, bold markers and quotes from one candidate.
fn clean_item(candidate: &str) -> String {
    let mut item = candidate.trim().trim_start_matches(BULLET_CHARS).trim_start();

    let unparenthesized = item.strip_prefix('(').unwrap_or(item);
    if let Some(end) = number_marker_end(unparenthesized.as_bytes()) {
        item = unparenthesized[end..].trim_start();
    } else if let Some(rest) = parenthesized_number(item) {
        item = rest;
    }

    let item = item.replace("**", "");
    strip_wrapping_quotes(item.trim()).trim().to_string()
}

/// Rest of `item` after a `(1) ` marker.
fn parenthesized_number(item: &str) -> Option<&str> {
    let rest = item.strip_prefix('(')?;
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || digits > 2 {
        return None;
    }
    let rest = rest[digits..].strip_prefix(')')?;
    Some(rest.trim_start())
}
