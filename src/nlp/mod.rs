// NLP module for docsum
pub mod backends;
pub mod enhancement;
pub mod language;
pub mod metrics;
pub mod normalizer;
pub mod scorer;
pub mod segmenter;
pub mod selector;
pub mod sentiment;
pub mod summarization;
pub mod topics;

pub use enhancement::{EnhancementCapability, LinguisticBackend};
pub use language::{detect_language, Language};
pub use sentiment::analyze_sentiment;
pub use summarization::SummaryEngine;
