//! Error types shared across the analysis pipeline.

use std::path::PathBuf;

/// Errors that can reach a caller of the analysis pipeline.
///
/// Only `ConflictingFieldFilter` is ever returned by [`crate::analysis::Analyzer::analyze`];
/// the other variants are folded into the result record as `ok: false`.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Field filter cannot specify both include and exclude")]
    ConflictingFieldFilter,

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to read {path}: {message}")]
    Document { path: PathBuf, message: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
