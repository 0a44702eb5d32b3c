//! Lexical normalization: tokenization, case folding / diacritic stripping and
//! stop-word filtering.
//!
//! Every token that feeds a frequency table goes through [`normalize_token`], so
//! vocalized and unvocalized Arabic spellings (or differently cased English
//! words) count as one entry. Normalization is idempotent.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use super::language::Language;

static WORD_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

static ENGLISH_STOP_WORDS: Lazy<HashSet<String>> = Lazy::new(|| {
    [
        "a", "an", "and", "are", "as", "at", "be", "been", "being", "by", "for", "from",
        "has", "have", "had", "he", "she", "her", "his", "him", "in", "is", "it", "its",
        "of", "on", "or", "that", "the", "their", "them", "there", "these", "they", "this",
        "those", "to", "was", "were", "will", "with", "would", "but", "not", "what", "when",
        "where", "who", "which", "why", "how", "we", "you", "your", "our", "us", "i", "me",
        "my", "do", "does", "did", "so", "if", "than", "then", "too", "very", "can", "could",
        "also", "into", "about", "all", "any", "some", "such", "no", "nor", "only", "own",
        "same", "just", "should", "shall", "may", "might", "am", "out", "up", "down",
    ]
    .iter()
    .map(|w| normalize_token(w, Language::English))
    .collect()
});

static ARABIC_STOP_WORDS: Lazy<HashSet<String>> = Lazy::new(|| {
    [
        "في", "من", "على", "إلى", "الى", "عن", "مع", "هذا", "هذه", "ذلك", "تلك", "التي",
        "الذي", "الذين", "اللذان", "اللتان", "هو", "هي", "هم", "هن", "نحن", "أنا", "أنت",
        "أنتم", "كان", "كانت", "يكون", "تكون", "لم", "لن", "لا", "ما", "ماذا", "متى",
        "أين", "كيف", "هل", "قد", "لقد", "ثم", "أو", "أم", "بل", "لكن", "حتى", "إذا",
        "إذ", "كل", "بعض", "غير", "بين", "عند", "عندما", "منذ", "بعد", "قبل", "حيث",
        "أن", "إن", "أي", "وهو", "وهي", "وقد", "وفي", "ومن", "كما", "فيه", "فيها", "به",
        "بها", "له", "لها", "لهم", "عليه", "عليها", "ذات", "جدا", "أيضا", "هناك", "هنا",
    ]
    .iter()
    .map(|w| normalize_token(w, Language::Arabic))
    .collect()
});

/// Combining marks stripped from Arabic after canonical decomposition: tanween,
/// short vowels, shadda, sukun, the hamza/madda combining forms and the
/// superscript alef.
pub fn is_arabic_diacritic(c: char) -> bool {
    matches!(c, '\u{064B}'..='\u{065F}' | '\u{0670}')
}

/// Remove Arabic diacritics without decomposing, keeping hamza-carrying letters
/// intact. Used for phrase matching where `أن` and `إن` must stay distinct.
pub fn strip_diacritics(text: &str) -> String {
    text.chars().filter(|c| !is_arabic_diacritic(*c) && *c != '\u{0640}').collect()
}

/// Normalize a single token for frequency counting.
///
/// English: lowercase. Arabic: NFD, then drop diacritics and tatweel. In both
/// cases leading/trailing non-alphanumeric characters are trimmed.
pub fn normalize_token(token: &str, language: Language) -> String {
    let folded: String = match language {
        Language::English => token.to_lowercase(),
        Language::Arabic => token
            .nfd()
            .filter(|c| !is_arabic_diacritic(*c) && *c != '\u{0640}')
            .collect(),
    };
    folded
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_string()
}

/// Split a sentence into raw tokens without normalization.
pub fn raw_tokens(sentence: &str, language: Language) -> Vec<String> {
    match language {
        Language::English => WORD_PATTERN
            .find_iter(sentence)
            .map(|m| m.as_str().to_string())
            .collect(),
        Language::Arabic => sentence.split_whitespace().map(String::from).collect(),
    }
}

pub fn is_stop_word(normalized: &str, language: Language) -> bool {
    match language {
        Language::English => ENGLISH_STOP_WORDS.contains(normalized),
        Language::Arabic => ARABIC_STOP_WORDS.contains(normalized),
    }
}

/// Normalize already-extracted tokens and keep the ones that carry signal:
/// longer than one character and not a stop word.
pub fn normalize_tokens<I, S>(tokens: I, language: Language) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|t| normalize_token(t.as_ref(), language))
        .filter(|t| t.chars().count() > 1)
        .filter(|t| !is_stop_word(t, language))
        .collect()
}

/// Tokenize and normalize a sentence into scoring-relevant words.
pub fn normalize(sentence: &str, language: Language) -> Vec<String> {
    normalize_tokens(raw_tokens(sentence, language), language)
}
