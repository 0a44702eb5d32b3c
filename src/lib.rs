//! Language-adaptive extractive summarization for English and Arabic text,
//! with document cleaning, sentiment, topics and reading metrics.

pub mod ai;
pub mod analysis;
pub mod config;
pub mod document;
pub mod error;
pub mod logging;
pub mod nlp;
pub mod projection;

pub use analysis::{AnalysisReport, AnalysisRequest, Analyzer};
pub use config::AppConfig;
pub use error::AnalysisError;
pub use projection::FieldFilter;
