//! Document analysis pipeline: cleaning, language, summary, sentiment, topics
//! and reading metrics, assembled into one record.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::ai::{AiError, GeminiSummarizer, SummaryProvider};
use crate::config::AppConfig;
use crate::document::{self, CleanedDocument};
use crate::error::AnalysisError;
use crate::nlp::enhancement::{backends_from_names, process_capability, EnhancementCapability};
use crate::nlp::language::{detect_language, Detection, Language};
use crate::nlp::metrics::{self, Difficulty};
use crate::nlp::sentiment::{analyze_sentiment, Sentiment};
use crate::nlp::summarization::SummaryEngine;
use crate::nlp::topics::detect_topics;
use crate::projection::{project, FieldFilter};

/// One document to analyze and how.
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub content: String,
    pub is_html: bool,
    /// Skips language identification when set.
    pub language: Option<Language>,
    pub sentence_count: Option<usize>,
    pub use_ai: bool,
    pub fields: Option<FieldFilter>,
}

impl AnalysisRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn html(mut self, is_html: bool) -> Self {
        self.is_html = is_html;
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    pub fn with_sentences(mut self, count: usize) -> Self {
        self.sentence_count = Some(count);
        self
    }

    pub fn with_ai(mut self, use_ai: bool) -> Self {
        self.use_ai = use_ai;
        self
    }

    pub fn with_fields(mut self, fields: FieldFilter) -> Self {
        self.fields = Some(fields);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummarySource {
    Extractive,
    Ai,
    ExtractiveFallback,
}

/// Successful analysis record, before field filtering.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub ok: bool,
    pub title: Option<String>,
    pub language: Language,
    pub language_confidence: f32,
    pub summary: String,
    pub summary_source: SummarySource,
    pub sentences_requested: usize,
    pub sentences_applied: usize,
    pub sentence_count_adjusted: bool,
    pub sentiment: Sentiment,
    pub topics: Vec<String>,
    pub reading_time_minutes: u32,
    pub difficulty: Difficulty,
    pub word_count: usize,
    pub sentence_count: usize,
    pub images: Vec<String>,
}

pub struct Analyzer {
    config: AppConfig,
    engine: SummaryEngine,
    ai: Option<Box<dyn SummaryProvider>>,
}

impl Analyzer {
    /// Analyzer with an explicit capability and no AI provider.
    pub fn new(config: AppConfig, capability: Arc<EnhancementCapability>) -> Self {
        let engine = SummaryEngine::new(capability).with_max_sentences(config.summary.max_sentences);
        Self {
            config,
            engine,
            ai: None,
        }
    }

    /// Analyzer wired from configuration: process-wide capability probe and,
    /// when a key is configured, the HTTP AI provider.
    pub fn from_config(config: AppConfig) -> Self {
        let capability = process_capability(|| {
            backends_from_names(&config.enhancements, config.morphology_lexicon.as_deref())
        });

        let ai: Option<Box<dyn SummaryProvider>> = match GeminiSummarizer::new(&config.ai) {
            Ok(provider) => Some(Box::new(provider)),
            Err(AiError::MissingApiKey) => None,
            Err(e) => {
                warn!(error = %e, "AI provider could not be initialized");
                None
            }
        };

        let mut analyzer = Self::new(config, capability);
        analyzer.ai = ai;
        analyzer
    }

    pub fn with_ai_provider(mut self, provider: Box<dyn SummaryProvider>) -> Self {
        self.ai = Some(provider);
        self
    }

    pub fn engine(&self) -> &SummaryEngine {
        &self.engine
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Analyze and project the record.
    ///
    /// The only error returned is a conflicting field filter. Other
    /// configuration problems come back as `{"ok": false, "error": ...}`.
    pub fn analyze(&self, request: &AnalysisRequest) -> Result<Value, AnalysisError> {
        if let Some(filter) = &request.fields {
            filter.validate()?;
        }

        let record = match self.build_report(request) {
            Ok(report) => serde_json::to_value(report)?,
            Err(e) => {
                warn!(error = %e, "analysis failed");
                json!({ "ok": false, "error": e.to_string() })
            }
        };

        project(record, request.fields.as_ref())
    }

    pub fn build_report(&self, request: &AnalysisRequest) -> Result<AnalysisReport, AnalysisError> {
        let ai = match (request.use_ai, &self.ai) {
            (true, None) => {
                return Err(AnalysisError::Config(
                    "AI mode requested but no API key is configured (set DOCSUM_AI_KEY or ai.api_key)".into(),
                ))
            }
            (true, Some(provider)) => Some(provider.as_ref()),
            (false, _) => None,
        };

        let cleaned: CleanedDocument = document::prepare(&request.content, request.is_html);
        let detection = match request.language {
            Some(language) => Detection {
                language,
                confidence: 1.0,
            },
            None => detect_language(&cleaned.text),
        };
        let language = detection.language;

        let requested = request
            .sentence_count
            .unwrap_or(self.config.summary.default_sentences);
        let budget = self.engine.sentence_budget(requested);
        if budget.adjusted {
            warn!(
                requested = budget.requested,
                applied = budget.applied,
                "sentence count adjusted to the allowed range"
            );
        }

        let (summary, summary_source) = match ai {
            Some(provider) => match provider.summarize(&cleaned.text, budget.applied) {
                Ok(summary) => (summary, SummarySource::Ai),
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "AI summary failed, using extractive engine");
                    (
                        self.engine.summarize_by_language(&cleaned.text, language, budget.applied),
                        SummarySource::ExtractiveFallback,
                    )
                }
            },
            None => (
                self.engine.summarize_by_language(&cleaned.text, language, budget.applied),
                SummarySource::Extractive,
            ),
        };

        let wpm = match language {
            Language::English => self.config.reading.english_wpm,
            Language::Arabic => self.config.reading.arabic_wpm,
        };
        let text_metrics = metrics::compute(&cleaned.text, language, wpm);

        info!(
            language = %language,
            words = text_metrics.word_count,
            source = ?summary_source,
            "document analyzed"
        );

        Ok(AnalysisReport {
            ok: true,
            title: cleaned.title.clone(),
            language,
            language_confidence: detection.confidence,
            summary,
            summary_source,
            sentences_requested: budget.requested,
            sentences_applied: budget.applied,
            sentence_count_adjusted: budget.adjusted,
            sentiment: analyze_sentiment(&cleaned.text, language),
            topics: detect_topics(&cleaned.text, language),
            reading_time_minutes: text_metrics.reading_time_minutes,
            difficulty: text_metrics.difficulty,
            word_count: text_metrics.word_count,
            sentence_count: text_metrics.sentence_count,
            images: cleaned.images,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    impl SummaryProvider for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn summarize(&self, _text: &str, _sentence_count: usize) -> Result<String, AiError> {
            Ok(self.0.to_string())
        }
    }

    struct Broken;

    impl SummaryProvider for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn summarize(&self, _text: &str, _sentence_count: usize) -> Result<String, AiError> {
            Err(AiError::EmptyResponse)
        }
    }

    const ARTICLE: &str = "Students returned to school this week. \
        Teachers prepared new lessons for every classroom. \
        The government announced a larger education budget. \
        Parents said the first day was wonderful. \
        In conclusion, the new school year is off to a great start.";

    fn analyzer() -> Analyzer {
        Analyzer::new(AppConfig::default(), Arc::new(EnhancementCapability::none()))
    }

    #[test]
    fn test_full_record() {
        let record = analyzer()
            .analyze(&AnalysisRequest::new(ARTICLE).with_sentences(2))
            .unwrap();
        assert_eq!(record["ok"], true);
        assert_eq!(record["language"], "en");
        assert_eq!(record["summary_source"], "extractive");
        assert_eq!(record["sentences_applied"], 2);
        assert_eq!(record["sentence_count"], 5);
        assert_eq!(record["sentiment"]["label"], "Positive");
        assert_eq!(record["topics"][0], "education");
        assert_eq!(record["difficulty"], "easy");
        assert_eq!(record["reading_time_minutes"], 1);
        assert!(record["summary"].as_str().unwrap().starts_with("Students returned to school"));
    }

    #[test]
    fn test_include_projection() {
        let request = AnalysisRequest::new(ARTICLE).with_fields(FieldFilter::include(["summary"]));
        let record = analyzer().analyze(&request).unwrap();
        let keys: Vec<&String> = record.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 2);
        assert!(record.get("ok").is_some());
        assert!(record.get("summary").is_some());
    }

    #[test]
    fn test_conflicting_projection_is_error() {
        let filter: FieldFilter =
            serde_json::from_value(json!({"include": ["summary"], "exclude": ["topics"]})).unwrap();
        let request = AnalysisRequest::new(ARTICLE).with_fields(filter);
        assert!(matches!(
            analyzer().analyze(&request),
            Err(AnalysisError::ConflictingFieldFilter)
        ));
    }

    #[test]
    fn test_sentence_count_adjustment_is_reported() {
        let record = analyzer()
            .analyze(&AnalysisRequest::new(ARTICLE).with_sentences(12))
            .unwrap();
        assert_eq!(record["sentences_requested"], 12);
        assert_eq!(record["sentences_applied"], 5);
        assert_eq!(record["sentence_count_adjusted"], true);
    }

    #[test]
    fn test_ai_without_key_is_config_failure() {
        let record = analyzer()
            .analyze(&AnalysisRequest::new(ARTICLE).with_ai(true))
            .unwrap();
        assert_eq!(record["ok"], false);
        assert!(record["error"].as_str().unwrap().contains("API key"));
    }

    #[test]
    fn test_ai_summary_used() {
        let analyzer = analyzer().with_ai_provider(Box::new(Fixed("An AI summary.")));
        let record = analyzer.analyze(&AnalysisRequest::new(ARTICLE).with_ai(true)).unwrap();
        assert_eq!(record["summary"], "An AI summary.");
        assert_eq!(record["summary_source"], "ai");
    }

    #[test]
    fn test_ai_failure_falls_back() {
        let analyzer = analyzer().with_ai_provider(Box::new(Broken));
        let request = AnalysisRequest::new(ARTICLE).with_ai(true).with_sentences(2);
        let record = analyzer.analyze(&request).unwrap();
        let expected = analyzer
            .engine()
            .summarize_by_language(ARTICLE, Language::English, 2);
        assert_eq!(record["summary"], expected.as_str());
        assert_eq!(record["summary_source"], "extractive-fallback");
    }

    #[test]
    fn test_html_arabic_document() {
        let html = "<html><head><title>التعليم</title></head><body>\
            <p>التعليم أساس تقدم المجتمعات الحديثة.</p>\
            <p>تهتم الدول بتطوير المدارس والجامعات.</p>\
            <img src=\"school.png\">\
            <p>يحتاج المعلمون إلى تدريب مستمر.</p></body></html>";
        let record = analyzer()
            .analyze(&AnalysisRequest::new(html).with_sentences(1))
            .unwrap();
        assert_eq!(record["language"], "ar");
        assert_eq!(record["title"], "التعليم");
        assert_eq!(record["images"][0], "school.png");
        assert_eq!(record["summary"], "التعليم أساس تقدم المجتمعات الحديثة.");
    }

    #[test]
    fn test_empty_document() {
        let record = analyzer().analyze(&AnalysisRequest::new("")).unwrap();
        assert_eq!(record["ok"], true);
        assert_eq!(record["summary"], "");
        assert_eq!(record["word_count"], 0);
    }
}
