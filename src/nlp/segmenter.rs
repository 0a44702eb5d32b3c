//! Sentence segmentation with per-language boundary rules.
//!
//! A boundary is a run of terminal punctuation, optionally followed by closing
//! quotes or brackets, followed by whitespace. The punctuation stays with the
//! sentence it ends. Arabic additionally accepts end-of-text as the trailing
//! context and has its own terminator set (question mark, semicolon, colon and
//! the Arabic full stop); the ideographic full stop is read as a plain period.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::language::Language;

/// One sentence of a document, tagged with its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sentence {
    pub text: String,
    pub index: usize,
}

static LATIN_BOUNDARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[.!?]+["'”’»)\]]*\s+"#).unwrap()
});

static ARABIC_BOUNDARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[.!?؟؛:۔。]+["'”’»)\]]*(?:\s+|$)"#).unwrap()
});

/// Split cleaned text into ordered sentences.
///
/// Whitespace-only fragments are dropped and each kept fragment is trimmed, so
/// indices always run `0..n` without gaps. Text without any boundary comes back
/// as a single sentence; empty or blank text yields no sentences.
pub fn segment(text: &str, language: Language) -> Vec<Sentence> {
    let boundary: &Regex = match language {
        Language::English => &LATIN_BOUNDARY,
        Language::Arabic => &ARABIC_BOUNDARY,
    };

    let mut fragments: Vec<&str> = Vec::new();
    let mut start = 0;
    for m in boundary.find_iter(text) {
        // Keep the punctuation, drop the separating whitespace.
        let end = start_of_trailing_whitespace(text, m.start(), m.end());
        fragments.push(&text[start..end]);
        start = m.end();
    }
    if start < text.len() {
        fragments.push(&text[start..]);
    }

    fragments
        .into_iter()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .enumerate()
        .map(|(index, f)| Sentence {
            text: f.to_string(),
            index,
        })
        .collect()
}

fn start_of_trailing_whitespace(text: &str, from: usize, to: usize) -> usize {
    let matched = &text[from..to];
    from + matched.trim_end().len()
}

/// Convenience for callers that only need the sentence strings.
pub fn sentence_texts(text: &str, language: Language) -> Vec<String> {
    segment(text, language).into_iter().map(|s| s.text).collect()
}
