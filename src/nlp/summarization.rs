// Extractive summarization engine.
// Segments, scores and selects sentences per language, and never fails: any
// internal error degrades to a naive period-split truncation of the input.
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use super::enhancement::EnhancementCapability;
use super::language::{detect_language, Language};
use super::scorer::score;
use super::segmenter::{segment, Sentence};
use super::selector::select;

pub const DEFAULT_MAX_SENTENCES: usize = 5;

#[derive(Debug, thiserror::Error)]
enum EngineError {
    #[error("summarization panicked: {0}")]
    Panicked(String),
}

/// Sentence count actually used for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SentenceBudget {
    pub requested: usize,
    pub applied: usize,
    pub adjusted: bool,
}

/// Entry point for extractive summaries.
///
/// The capability is probed by the caller and passed in, so a test can pin the
/// exact set of providers.
#[derive(Debug, Clone)]
pub struct SummaryEngine {
    capability: Arc<EnhancementCapability>,
    max_sentences: usize,
}

impl Default for SummaryEngine {
    fn default() -> Self {
        Self::basic()
    }
}

impl SummaryEngine {
    pub fn new(capability: Arc<EnhancementCapability>) -> Self {
        Self {
            capability,
            max_sentences: DEFAULT_MAX_SENTENCES,
        }
    }

    /// Engine without enhancement providers.
    pub fn basic() -> Self {
        Self::new(Arc::new(EnhancementCapability::none()))
    }

    pub fn with_max_sentences(mut self, max_sentences: usize) -> Self {
        self.max_sentences = max_sentences.max(1);
        self
    }

    pub fn capability(&self) -> &EnhancementCapability {
        &self.capability
    }

    pub fn max_sentences(&self) -> usize {
        self.max_sentences
    }

    /// Clamp a requested sentence count to `1..=max_sentences`.
    pub fn sentence_budget(&self, requested: usize) -> SentenceBudget {
        let applied = requested.clamp(1, self.max_sentences);
        SentenceBudget {
            requested,
            applied,
            adjusted: applied != requested,
        }
    }

    /// Summarize with language identification.
    pub fn summarize(&self, text: &str, sentence_count: usize) -> String {
        let language = detect_language(text).language;
        self.summarize_by_language(text, language, sentence_count)
    }

    /// Summarize `text` into at most `sentence_count` sentences (after clamping).
    ///
    /// Returns an empty string only for input without sentences.
    pub fn summarize_by_language(&self, text: &str, language: Language, sentence_count: usize) -> String {
        let k = self.sentence_budget(sentence_count).applied;

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.try_summarize(text, language, k)))
            .map_err(|payload| EngineError::Panicked(panic_message(payload.as_ref())));

        match outcome {
            Ok(summary) => summary,
            Err(e) => {
                warn!(error = %e, language = %language, "summarization failed, truncating input");
                fallback_truncate(text, k)
            }
        }
    }

    fn try_summarize(&self, text: &str, language: Language, k: usize) -> String {
        let sentences = segment(text, language);
        if sentences.len() <= k {
            debug!(sentences = sentences.len(), k, "short document, returning all sentences");
            return join(&sentences);
        }

        let scored = score(&sentences, language, &self.capability);
        let selected = select(&scored, k);
        debug!(
            sentences = sentences.len(),
            selected = selected.len(),
            enhanced = self.capability.has_enhanced(),
            "extractive summary built"
        );
        join(&selected)
    }
}

fn join(sentences: &[Sentence]) -> String {
    sentences
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Degraded summary: the first `k` period-separated fragments of the input.
/// Returns the input unchanged when that yields nothing.
pub fn fallback_truncate(text: &str, k: usize) -> String {
    let fragments: Vec<&str> = text
        .split('.')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .take(k)
        .collect();

    if fragments.is_empty() {
        return text.to_string();
    }
    format!("{}.", fragments.join(". "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::backends::{ArabicMorphology, UnicodeWords};
    use crate::nlp::enhancement::{BackendError, LinguisticBackend};
    use crate::nlp::segmenter::sentence_texts;

    struct Exploding;

    impl LinguisticBackend for Exploding {
        fn name(&self) -> &'static str {
            "exploding"
        }

        fn probe(&self) -> Result<(), BackendError> {
            Ok(())
        }

        fn tokenize(&self, sentence: &str) -> Result<Vec<String>, BackendError> {
            if sentence.contains("عطل") {
                panic!("backend crashed");
            }
            Ok(sentence.split_whitespace().map(String::from).collect())
        }
    }

    const ESSAY: &str = "Renewable energy is transforming the global power sector. \
        Solar panels have become far cheaper over the last decade. \
        Many cities now buy renewable energy for public buildings. \
        Critics worry about storage and grid stability. \
        Battery storage costs are also falling quickly. \
        Engineers are building grid connections for renewable energy projects. \
        In conclusion, renewable energy must remain a policy priority.";

    #[test]
    fn test_repeated_sentence_keeps_first_and_last() {
        let text = "Cats chase small mice. Small mice chase cats. Mice chase small cats. Chase small cats mice.";
        let engine = SummaryEngine::basic();
        let summary = engine.summarize_by_language(text, Language::English, 2);
        assert_eq!(summary, "Cats chase small mice. Chase small cats mice.");
    }

    #[test]
    fn test_short_document_returned_whole() {
        let text = "The first sentence is here. The second one follows.";
        let engine = SummaryEngine::basic();
        let summary = engine.summarize_by_language(text, Language::English, 5);
        assert_eq!(summary, "The first sentence is here. The second one follows.");
    }

    #[test]
    fn test_empty_input_yields_empty_summary() {
        let engine = SummaryEngine::basic();
        assert_eq!(engine.summarize_by_language("", Language::English, 3), "");
        assert_eq!(engine.summarize_by_language("", Language::Arabic, 3), "");
    }

    #[test]
    fn test_short_circuit_equals_segment_join() {
        let engine = SummaryEngine::basic().with_max_sentences(10);
        let segmented = sentence_texts(ESSAY, Language::English).join(" ");
        assert_eq!(engine.summarize_by_language(ESSAY, Language::English, 7), segmented);
        assert_eq!(engine.summarize_by_language(ESSAY, Language::English, 10), segmented);
    }

    #[test]
    fn test_summary_preserves_document_order() {
        let engine = SummaryEngine::basic();
        let all = sentence_texts(ESSAY, Language::English);
        let summary = engine.summarize_by_language(ESSAY, Language::English, 3);

        let positions: Vec<usize> = all
            .iter()
            .enumerate()
            .filter(|(_, s)| summary.contains(s.as_str()))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(positions.len(), 3);
        let rebuilt: Vec<&str> = positions.iter().map(|&i| all[i].as_str()).collect();
        assert_eq!(summary, rebuilt.join(" "));
    }

    #[test]
    fn test_summary_prefers_boosted_sentences() {
        let engine = SummaryEngine::basic();
        let summary = engine.summarize_by_language(ESSAY, Language::English, 2);
        assert!(summary.starts_with("Renewable energy is transforming"));
        assert!(summary.ends_with("must remain a policy priority."));
    }

    #[test]
    fn test_sentence_budget() {
        let engine = SummaryEngine::basic();
        assert_eq!(
            engine.sentence_budget(0),
            SentenceBudget { requested: 0, applied: 1, adjusted: true }
        );
        assert_eq!(
            engine.sentence_budget(9),
            SentenceBudget { requested: 9, applied: 5, adjusted: true }
        );
        assert_eq!(
            engine.sentence_budget(3),
            SentenceBudget { requested: 3, applied: 3, adjusted: false }
        );
        assert_eq!(engine.clone().with_max_sentences(8).sentence_budget(9).applied, 8);
    }

    #[test]
    fn test_zero_sentence_count_yields_one_sentence() {
        let engine = SummaryEngine::basic();
        let summary = engine.summarize_by_language(ESSAY, Language::English, 0);
        assert_eq!(sentence_texts(&summary, Language::English).len(), 1);
    }

    #[test]
    fn test_arabic_summary_with_and_without_enhancement() {
        let text = "التعليم أساس تقدم المجتمعات الحديثة. \
            تهتم الدول بتطوير المدارس والجامعات. \
            يحتاج المعلمون إلى تدريب مستمر. \
            تساعد التقنية الطلاب على التعلم الذاتي. \
            الخلاصة أن التعليم يجب أن يبقى أولوية وطنية.";
        let basic = SummaryEngine::basic();
        let enhanced = SummaryEngine::new(Arc::new(EnhancementCapability::detect(vec![
            Arc::new(ArabicMorphology::new()),
            Arc::new(UnicodeWords),
        ])));
        assert!(enhanced.capability().has_enhanced());

        for engine in [basic, enhanced] {
            let summary = engine.summarize_by_language(text, Language::Arabic, 2);
            let picked = sentence_texts(&summary, Language::Arabic);
            assert_eq!(picked.len(), 2);
            assert!(summary.starts_with("التعليم أساس تقدم المجتمعات الحديثة."));
        }
    }

    #[test]
    fn test_backend_panic_keeps_extractive_summary() {
        let text = "التعليم أساس تقدم المجتمعات. التعليم يبني المجتمعات القوية! \
            هنا عطل صغير جدا؟ التعليم أساس التقدم الحقيقي.";
        let engine = SummaryEngine::new(Arc::new(EnhancementCapability::detect(vec![Arc::new(Exploding)])));
        let summary = engine.summarize_by_language(text, Language::Arabic, 2);
        assert_eq!(summary, "التعليم أساس تقدم المجتمعات. التعليم أساس التقدم الحقيقي.");
    }

    #[test]
    fn test_fallback_truncate() {
        assert_eq!(fallback_truncate("One. Two. Three.", 2), "One. Two.");
        assert_eq!(fallback_truncate("no periods here", 2), "no periods here.");
        assert_eq!(fallback_truncate("...", 2), "...");
        assert_eq!(fallback_truncate("", 2), "");
    }

    #[test]
    fn test_summarize_detects_language() {
        let engine = SummaryEngine::basic();
        let summary = engine.summarize("العلم نور. والجهل ظلام.", 1);
        assert_eq!(summary, "العلم نور.");
    }
}
