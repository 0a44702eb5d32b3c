// Sentiment analysis using a lexicon-based approach.
// Word lists per language, intensifiers scale a hit by 1.5 and a nearby
// negation flips its polarity.
use std::collections::HashSet;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::language::Language;
use super::normalizer::{normalize_token, raw_tokens};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub label: String,
    pub score: f32,
}

struct Lexicon {
    positive: HashSet<String>,
    negative: HashSet<String>,
    intensifiers: HashSet<String>,
    negations: HashSet<String>,
}

impl Lexicon {
    fn build(
        language: Language,
        positive: &[&str],
        negative: &[&str],
        intensifiers: &[&str],
        negations: &[&str],
    ) -> Self {
        let set = |words: &[&str]| -> HashSet<String> {
            words.iter().map(|w| normalize_token(w, language)).collect()
        };
        Self {
            positive: set(positive),
            negative: set(negative),
            intensifiers: set(intensifiers),
            negations: set(negations),
        }
    }
}

static ENGLISH: Lazy<Lexicon> = Lazy::new(|| {
    Lexicon::build(
        Language::English,
        &[
            "good", "great", "excellent", "wonderful", "fantastic", "amazing", "awesome",
            "love", "happy", "joy", "pleased", "delighted", "satisfied", "perfect",
            "beautiful", "brilliant", "outstanding", "superb", "remarkable", "best",
            "better", "positive", "advantage", "benefit", "success", "successful",
            "win", "winner", "winning", "achievement", "triumph", "enjoy", "pleasant",
            "comfortable", "excited", "exciting", "thrilled", "approve", "approved",
            "like", "liked", "favorite", "prefer", "improve", "improved", "progress",
        ],
        &[
            "bad", "terrible", "awful", "horrible", "poor", "worst", "worse",
            "hate", "angry", "sad", "upset", "disappointed", "dissatisfied", "unhappy",
            "fail", "failure", "failed", "problem", "issue", "wrong", "error",
            "difficult", "struggle", "struggling", "broken", "pain", "painful", "hurt",
            "damage", "damaged", "disaster", "negative", "loss", "lose", "losing", "lost",
            "defeat", "defeated", "reject", "rejected", "dislike", "unpleasant",
            "disappointing", "frustrate", "frustrated", "frustrating", "crisis",
        ],
        &["very", "extremely", "absolutely", "really", "incredibly", "highly", "totally"],
        &["not", "no", "never", "nothing", "nobody", "nowhere", "neither", "nor", "none"],
    )
});

static ARABIC: Lazy<Lexicon> = Lazy::new(|| {
    Lexicon::build(
        Language::Arabic,
        &[
            "جيد", "جيدة", "ممتاز", "ممتازة", "رائع", "رائعة", "جميل", "جميلة", "سعيد",
            "سعادة", "نجاح", "ناجح", "فوز", "أفضل", "حب", "أحب", "مفيد", "مفيدة",
            "إيجابي", "مذهل", "فرح", "تحسن", "إنجاز", "متميز", "تقدم", "مبهج",
        ],
        &[
            "سيء", "سيئ", "سيئة", "فشل", "فاشل", "حزين", "حزن", "مشكلة", "مشاكل", "خطأ",
            "كارثة", "سلبي", "ضعيف", "أسوأ", "كره", "أكره", "خسارة", "ألم", "غضب", "صعب",
            "أزمة", "مؤلم", "محبط",
        ],
        &["جدا", "للغاية", "كثيرا", "تماما", "حقا"],
        &["لا", "لم", "لن", "ليس", "ليست", "غير", "ما"],
    )
});

fn words(text: &str, language: Language) -> Vec<String> {
    match language {
        Language::English => text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric() && c != '\'')
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        Language::Arabic => raw_tokens(text, language)
            .iter()
            .map(|t| normalize_token(t, language))
            .filter(|t| !t.is_empty())
            .collect(),
    }
}

pub fn analyze_sentiment(text: &str, language: Language) -> Sentiment {
    let lexicon: &Lexicon = match language {
        Language::English => &ENGLISH,
        Language::Arabic => &ARABIC,
    };
    let words = words(text, language);

    let mut positive_score = 0.0;
    let mut negative_score = 0.0;

    for (i, word) in words.iter().enumerate() {
        let is_positive = lexicon.positive.contains(word);
        let is_negative = lexicon.negative.contains(word);
        if !is_positive && !is_negative {
            continue;
        }

        // English intensifiers precede the word, Arabic ones usually follow it.
        let intensified = match language {
            Language::English => i > 0 && lexicon.intensifiers.contains(&words[i - 1]),
            Language::Arabic => words.get(i + 1).map(|w| lexicon.intensifiers.contains(w)).unwrap_or(false),
        };
        let multiplier = if intensified { 1.5 } else { 1.0 };

        let is_negated = (i > 0 && lexicon.negations.contains(&words[i - 1]))
            || (i > 1 && lexicon.negations.contains(&words[i - 2]));

        if is_positive != is_negated {
            positive_score += multiplier;
        } else {
            negative_score += multiplier;
        }
    }

    let total_score = positive_score + negative_score;
    if total_score == 0.0 {
        return neutral();
    }

    let pos_ratio = positive_score / total_score;
    let neg_ratio = negative_score / total_score;

    if pos_ratio > neg_ratio + 0.1 {
        Sentiment {
            label: "Positive".to_string(),
            score: pos_ratio,
        }
    } else if neg_ratio > pos_ratio + 0.1 {
        Sentiment {
            label: "Negative".to_string(),
            score: neg_ratio,
        }
    } else {
        neutral()
    }
}

fn neutral() -> Sentiment {
    Sentiment {
        label: "Neutral".to_string(),
        score: 0.5,
    }
}
