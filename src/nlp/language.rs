//! Language tags and script-based language identification.

use serde::{Deserialize, Serialize};

/// Languages the summarization core has scoring policies for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ar")]
    Arabic,
}

impl Language {
    /// Map a language tag to a supported language. Anything unrecognized is English,
    /// since the core has no "unknown" policy.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "ar" | "ara" | "arabic" => Language::Arabic,
            t if t.starts_with("ar-") || t.starts_with("ar_") => Language::Arabic,
            _ => Language::English,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Arabic => "ar",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Result of language identification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Detection {
    pub language: Language,
    pub confidence: f32,
}

// Share of Arabic-script letters above which a text is classified as Arabic.
const ARABIC_RATIO_THRESHOLD: f32 = 0.3;

pub fn is_arabic_char(c: char) -> bool {
    matches!(c,
        '\u{0600}'..='\u{06FF}' |
        '\u{0750}'..='\u{077F}' |
        '\u{08A0}'..='\u{08FF}' |
        '\u{FB50}'..='\u{FDFF}' |
        '\u{FE70}'..='\u{FEFF}'
    )
}

/// Classify text as English or Arabic by script share.
pub fn detect_language(text: &str) -> Detection {
    let mut letters = 0usize;
    let mut arabic = 0usize;
    for c in text.chars().filter(|c| c.is_alphabetic()) {
        letters += 1;
        if is_arabic_char(c) {
            arabic += 1;
        }
    }

    if letters == 0 {
        return Detection {
            language: Language::English,
            confidence: 0.0,
        };
    }

    let ratio = arabic as f32 / letters as f32;
    if ratio >= ARABIC_RATIO_THRESHOLD {
        Detection {
            language: Language::Arabic,
            confidence: ratio,
        }
    } else {
        Detection {
            language: Language::English,
            confidence: 1.0 - ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag() {
        assert_eq!(Language::from_tag("ar"), Language::Arabic);
        assert_eq!(Language::from_tag("AR-eg"), Language::Arabic);
        assert_eq!(Language::from_tag("en"), Language::English);
        assert_eq!(Language::from_tag("fr"), Language::English);
        assert_eq!(Language::from_tag(""), Language::English);
    }

    #[test]
    fn test_detect_arabic() {
        let detection = detect_language("هذا نص عربي قصير عن التعليم");
        assert_eq!(detection.language, Language::Arabic);
        assert!(detection.confidence > 0.9);
    }

    #[test]
    fn test_detect_english() {
        let detection = detect_language("This is a short English text.");
        assert_eq!(detection.language, Language::English);
        assert!(detection.confidence > 0.9);
    }

    #[test]
    fn test_detect_empty() {
        let detection = detect_language("   123 ...");
        assert_eq!(detection.language, Language::English);
        assert_eq!(detection.confidence, 0.0);
    }

    #[test]
    fn test_serde_codes() {
        assert_eq!(serde_json::to_string(&Language::Arabic).unwrap(), "\"ar\"");
        let lang: Language = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(lang, Language::English);
    }
}
