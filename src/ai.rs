//! AI-backed summarization through a generative-text HTTP API.
//!
//! This is an alternate strategy only. Callers fall back to the extractive
//! engine on any error.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AiConfig;

// Keeps prompts within the model's input window.
const MAX_INPUT_CHARS: usize = 30_000;

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("AI mode requires an API key (set DOCSUM_AI_KEY or ai.api_key)")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("service returned no text")]
    EmptyResponse,
}

/// Something that can produce a summary from text.
pub trait SummaryProvider: Send + Sync {
    fn name(&self) -> &str;

    fn summarize(&self, text: &str, sentence_count: usize) -> Result<String, AiError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Default)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Default)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

pub struct GeminiSummarizer {
    client: Client,
    config: AiConfig,
    api_key: String,
}

impl GeminiSummarizer {
    pub fn new(config: &AiConfig) -> Result<Self, AiError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(AiError::MissingApiKey)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;
        Ok(Self {
            client,
            config: config.clone(),
            api_key,
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    fn request(&self, text: &str, sentence_count: usize) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(build_prompt(text, sentence_count)),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
            },
        }
    }
}

impl SummaryProvider for GeminiSummarizer {
    fn name(&self) -> &str {
        &self.config.model
    }

    fn summarize(&self, text: &str, sentence_count: usize) -> Result<String, AiError> {
        debug!(model = %self.config.model, sentence_count, "requesting AI summary");
        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request(text, sentence_count))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AiError::Status {
                status: status.as_u16(),
                body: body.chars().take(500).collect(),
            });
        }

        extract_summary(response.json()?)
    }
}

fn build_prompt(text: &str, sentence_count: usize) -> String {
    let excerpt: String = text.chars().take(MAX_INPUT_CHARS).collect();
    format!(
        "Summarize the following text in at most {} sentences. \
         Write the summary in the same language as the text. \
         Return only the summary.\n\n{}",
        sentence_count, excerpt
    )
}

fn extract_summary(response: GenerateResponse) -> Result<String, AiError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| {
            c.parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        Err(AiError::EmptyResponse)
    } else {
        Ok(text.to_string())
    }
}
