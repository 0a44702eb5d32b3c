//! Configuration: JSON file, then environment, then CLI flags (applied by the caller).

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::nlp::summarization::DEFAULT_MAX_SENTENCES;

pub const ENV_AI_KEY: &str = "DOCSUM_AI_KEY";
pub const ENV_AI_MODEL: &str = "DOCSUM_AI_MODEL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub default_sentences: usize,
    pub max_sentences: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            default_sentences: 3,
            max_sentences: DEFAULT_MAX_SENTENCES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadingConfig {
    pub english_wpm: u32,
    pub arabic_wpm: u32,
}

impl Default for ReadingConfig {
    fn default() -> Self {
        Self {
            english_wpm: 200,
            arabic_wpm: 150,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-1.5-flash".to_string(),
            temperature: 0.3,
            max_output_tokens: 512,
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 20,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub summary: SummaryConfig,
    /// Enhancement provider names in preference order. Empty means basic scoring.
    pub enhancements: Vec<String>,
    pub morphology_lexicon: Option<PathBuf>,
    pub reading: ReadingConfig,
    pub ai: AiConfig,
}

impl AppConfig {
    /// Read a JSON config file. Missing sections take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, AnalysisError> {
        let file = File::open(path).map_err(|e| {
            AnalysisError::Config(format!("cannot open {}: {}", path.display(), e))
        })?;
        serde_json::from_reader(file)
            .map_err(|e| AnalysisError::Config(format!("invalid config {}: {}", path.display(), e)))
    }

    /// Load from an optional JSON file and apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, AnalysisError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => AppConfig::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Overlay values from the environment. `lookup` is injectable for tests.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ENV_AI_KEY).filter(|k| !k.trim().is_empty()) {
            self.ai.api_key = Some(key);
        }
        if let Some(model) = lookup(ENV_AI_MODEL).filter(|m| !m.trim().is_empty()) {
            self.ai.model = model;
        }
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.summary.max_sentences == 0 {
            return Err(AnalysisError::Config("summary.max_sentences must be at least 1".into()));
        }
        if self.reading.english_wpm == 0 || self.reading.arabic_wpm == 0 {
            return Err(AnalysisError::Config("reading speeds must be positive".into()));
        }
        if !(0.0..=2.0).contains(&self.ai.temperature) {
            return Err(AnalysisError::Config(format!(
                "ai.temperature {} is outside 0.0..=2.0",
                self.ai.temperature
            )));
        }
        Ok(())
    }
}
