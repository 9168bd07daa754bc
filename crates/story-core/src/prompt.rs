//! Prompt helpers for fingerprinting and bounding prompt text.

use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a prompt string.
pub fn hash_prompt(prompt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(prompt.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}

/// Return at most `max_chars` characters from the start of `text`.
///
/// Counts characters, not bytes, so multi-byte scripts are never split
/// inside a code point.
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_prompt_stable() {
        let first = hash_prompt("test prompt");
        let second = hash_prompt("test prompt");
        let different = hash_prompt("another prompt");

        assert_eq!(first, second);
        assert_ne!(first, different);
        assert_eq!(first.len(), 64);
    }

    #[test]
    fn test_excerpt_counts_chars() {
        assert_eq!(excerpt("hello", 3), "hel");
        assert_eq!(excerpt("hello", 10), "hello");
        assert_eq!(excerpt("", 4), "");
        // Each of these is a multi-byte character.
        assert_eq!(excerpt("đường đi", 5), "đường");
    }
}
