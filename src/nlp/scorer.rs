//! Frequency-density sentence scoring with positional and discourse-marker boosts.
//!
//! Score of a sentence, in order of application:
//!
//! 1. zero if it has fewer normalized tokens than the language minimum;
//! 2. sum of document frequencies of its tokens divided by its token count;
//! 3. plus `nouns * noun_weight` under the enhanced policy;
//! 4. times the positional boost (first, last, or lead window);
//! 5. times the marker boost if any discourse marker occurs (applied once).
//!
//! The enhanced policy exists only for Arabic and only when a provider loaded.
//! Provider errors degrade to whitespace tokenization for that one sentence.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use super::enhancement::{BackendError, EnhancementCapability, LinguisticBackend, PosTag};
use super::language::Language;
use super::normalizer::{normalize, normalize_tokens, strip_diacritics};
use super::segmenter::Sentence;

/// A sentence annotated with its importance score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredSentence {
    pub sentence: Sentence,
    pub score: f64,
}

/// Token counts across one document. Rebuilt for every call.
#[derive(Debug, Clone, Default)]
pub struct WordFrequencyTable {
    counts: HashMap<String, usize>,
}

impl WordFrequencyTable {
    pub fn build<'a, I>(token_lists: I) -> Self
    where
        I: IntoIterator<Item = &'a [String]>,
    {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for tokens in token_lists {
            for token in tokens {
                *counts.entry(token.clone()).or_insert(0) += 1;
            }
        }
        Self { counts }
    }

    pub fn frequency(&self, token: &str) -> usize {
        self.counts.get(token).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Tunable weights for one language and policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringPolicy {
    pub min_tokens: usize,
    pub first_boost: f64,
    pub last_boost: f64,
    /// Fraction of the document, from the start, that gets `lead_boost`.
    pub lead_fraction: f64,
    pub lead_boost: f64,
    pub marker_boost: f64,
    /// Added per noun; zero disables the noun-density term.
    pub noun_weight: f64,
}

impl ScoringPolicy {
    pub fn basic(language: Language) -> Self {
        match language {
            Language::English => Self {
                min_tokens: 3,
                first_boost: 1.25,
                last_boost: 1.25,
                lead_fraction: 0.1,
                lead_boost: 1.1,
                marker_boost: 1.2,
                noun_weight: 0.0,
            },
            Language::Arabic => Self {
                min_tokens: 2,
                first_boost: 1.5,
                last_boost: 1.25,
                lead_fraction: 0.2,
                lead_boost: 1.2,
                marker_boost: 1.15,
                noun_weight: 0.0,
            },
        }
    }

    /// English has no enhanced variant and gets its basic policy back.
    pub fn enhanced(language: Language) -> Self {
        match language {
            Language::English => Self::basic(language),
            Language::Arabic => Self {
                marker_boost: 1.3,
                noun_weight: 0.5,
                ..Self::basic(language)
            },
        }
    }

    fn positional_boost(&self, position: usize, total: usize) -> f64 {
        if position == 0 {
            self.first_boost
        } else if position + 1 == total {
            self.last_boost
        } else if (position as f64) < total as f64 * self.lead_fraction {
            self.lead_boost
        } else {
            1.0
        }
    }
}

static ENGLISH_MARKERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(must|essential|in conclusion|in summary|to summarize|important|importantly|significant|significantly|crucial|critical|key|therefore|consequently|notably|fundamental|above all|overall)\b",
    )
    .unwrap()
});

// Stored without diacritics; matched against diacritic-stripped text.
const ARABIC_MARKERS: &[&str] = &[
    "يجب",
    "ضروري",
    "ضرورية",
    "خلاصة",
    "نتيجة",
    "إن",
    "مهم",
    "مهمة",
    "أهم",
    "أساسي",
    "لذلك",
    "بالتالي",
    "باختصار",
    "في النهاية",
    "في الختام",
    "من الضروري",
];

const ARABIC_CLITIC_PREFIXES: &[&str] = &["", "و", "ف", "ال", "وال", "فال", "بال", "لل"];

/// First discourse marker found in the sentence, if any.
pub fn find_marker(sentence: &str, language: Language) -> Option<String> {
    match language {
        Language::English => ENGLISH_MARKERS
            .find(sentence)
            .map(|m| m.as_str().to_lowercase()),
        Language::Arabic => find_arabic_marker(sentence).map(String::from),
    }
}

fn find_arabic_marker(sentence: &str) -> Option<&'static str> {
    let stripped = strip_diacritics(sentence);
    let words: Vec<&str> = stripped
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .collect();
    let joined = format!(" {} ", words.join(" "));

    ARABIC_MARKERS.iter().copied().find(|marker| {
        if marker.contains(' ') {
            joined.contains(&format!(" {} ", marker))
        } else {
            words.iter().any(|word| {
                ARABIC_CLITIC_PREFIXES
                    .iter()
                    .any(|prefix| word.strip_prefix(prefix) == Some(*marker))
            })
        }
    })
}

struct SentenceTerms {
    tokens: Vec<String>,
    nouns: usize,
}

fn basic_terms(sentence: &Sentence, language: Language) -> SentenceTerms {
    SentenceTerms {
        tokens: normalize(&sentence.text, language),
        nouns: 0,
    }
}

/// Run one backend call for one sentence. Errors and panics are contained
/// here so a single bad sentence never stops scoring.
fn call_backend<T, F>(backend: &dyn LinguisticBackend, sentence: &Sentence, call: F) -> Option<T>
where
    F: FnOnce() -> Result<T, BackendError>,
{
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(value)) => Some(value),
        Ok(Err(e)) => {
            debug!(backend = backend.name(), sentence = sentence.index, error = %e, "backend call failed");
            None
        }
        Err(_) => {
            debug!(backend = backend.name(), sentence = sentence.index, "backend call panicked");
            None
        }
    }
}

fn enhanced_terms(
    sentence: &Sentence,
    language: Language,
    backend: &dyn LinguisticBackend,
) -> SentenceTerms {
    let Some(raw) = call_backend(backend, sentence, || backend.tokenize(&sentence.text)) else {
        return SentenceTerms {
            tokens: normalize_tokens(sentence.text.split_whitespace(), language),
            nouns: 0,
        };
    };

    let nouns = call_backend(backend, sentence, || backend.pos_tag(&raw))
        .flatten()
        .map(|tags| tags.iter().filter(|t| **t == PosTag::Noun).count())
        .unwrap_or(0);

    SentenceTerms {
        tokens: normalize_tokens(raw, language),
        nouns,
    }
}

/// Score every sentence. Output is index-aligned with the input.
pub fn score(
    sentences: &[Sentence],
    language: Language,
    capability: &EnhancementCapability,
) -> Vec<ScoredSentence> {
    let backend = match language {
        Language::Arabic => capability.primary(),
        Language::English => None,
    };
    let policy = match backend {
        Some(_) => ScoringPolicy::enhanced(language),
        None => ScoringPolicy::basic(language),
    };

    let terms: Vec<SentenceTerms> = sentences
        .iter()
        .map(|s| match backend {
            Some(b) => enhanced_terms(s, language, b),
            None => basic_terms(s, language),
        })
        .collect();

    score_with_policy(sentences, &terms, language, &policy)
}

fn score_with_policy(
    sentences: &[Sentence],
    terms: &[SentenceTerms],
    language: Language,
    policy: &ScoringPolicy,
) -> Vec<ScoredSentence> {
    let table = WordFrequencyTable::build(terms.iter().map(|t| t.tokens.as_slice()));
    let total = sentences.len();

    sentences
        .iter()
        .zip(terms)
        .enumerate()
        .map(|(position, (sentence, terms))| {
            let count = terms.tokens.len();
            let score = if count < policy.min_tokens {
                0.0
            } else {
                let raw: usize = terms.tokens.iter().map(|t| table.frequency(t)).sum();
                let mut score = raw as f64 / count as f64;
                score += terms.nouns as f64 * policy.noun_weight;
                score *= policy.positional_boost(position, total);
                if find_marker(&sentence.text, language).is_some() {
                    score *= policy.marker_boost;
                }
                score
            };
            ScoredSentence {
                sentence: sentence.clone(),
                score,
            }
        })
        .collect()
}
