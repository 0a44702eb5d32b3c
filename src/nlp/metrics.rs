//! Word counts, reading time and a coarse difficulty rating.

use serde::Serialize;

use super::language::Language;
use super::segmenter::segment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextMetrics {
    pub word_count: usize,
    pub sentence_count: usize,
    pub reading_time_minutes: u32,
    pub difficulty: Difficulty,
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
        .filter(|w| w.chars().any(char::is_alphanumeric))
}

pub fn word_count(text: &str) -> usize {
    words(text).count()
}

/// Whole minutes at `words_per_minute`, rounded up; at least one minute for
/// any non-empty text.
pub fn reading_time_minutes(word_count: usize, words_per_minute: u32) -> u32 {
    if word_count == 0 {
        return 0;
    }
    let wpm = words_per_minute.max(1) as usize;
    word_count.div_ceil(wpm).max(1) as u32
}

/// Rate difficulty from average sentence length and average word length,
/// each measured against a typical value for the language.
pub fn difficulty(word_count: usize, sentence_count: usize, avg_word_len: f64, language: Language) -> Difficulty {
    if word_count == 0 || sentence_count == 0 {
        return Difficulty::Easy;
    }
    let (typical_sentence, typical_word) = match language {
        Language::English => (20.0, 5.0),
        Language::Arabic => (22.0, 4.5),
    };
    let avg_sentence = word_count as f64 / sentence_count as f64;
    let complexity = avg_sentence / typical_sentence + avg_word_len / typical_word;

    if complexity < 1.8 {
        Difficulty::Easy
    } else if complexity < 2.4 {
        Difficulty::Medium
    } else {
        Difficulty::Hard
    }
}

pub fn compute(text: &str, language: Language, words_per_minute: u32) -> TextMetrics {
    let word_lengths: Vec<usize> = words(text)
        .map(|w| w.chars().filter(|c| c.is_alphanumeric()).count())
        .collect();
    let word_count = word_lengths.len();
    let avg_word_len = if word_count == 0 {
        0.0
    } else {
        word_lengths.iter().sum::<usize>() as f64 / word_count as f64
    };
    let sentence_count = segment(text, language).len();

    TextMetrics {
        word_count,
        sentence_count,
        reading_time_minutes: reading_time_minutes(word_count, words_per_minute),
        difficulty: difficulty(word_count, sentence_count, avg_word_len, language),
    }
}
