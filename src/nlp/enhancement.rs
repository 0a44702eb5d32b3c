//! Optional linguistic providers and the process-wide capability probe.
//!
//! Providers are injected, never discovered: a caller hands
//! [`EnhancementCapability::detect`] an ordered list of candidates, each one is
//! probed once, and the ones that answer become available in preference order.
//! An empty capability is the default and fully supported configuration; the
//! scorer then runs its basic policy.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::backends::{ArabicMorphology, UnicodeWords};

/// Coarse part-of-speech tags. Only `Noun` affects scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PosTag {
    Noun,
    Verb,
    Particle,
    Other,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum BackendError {
    #[error("{backend} is unavailable: {reason}")]
    Unavailable { backend: &'static str, reason: String },

    #[error("{backend} cannot analyze this input: {reason}")]
    Unsupported { backend: &'static str, reason: String },
}

/// A tokenizer or analyzer that can improve scoring when present.
pub trait LinguisticBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Acquire whatever the provider needs. Called once per process.
    fn probe(&self) -> Result<(), BackendError>;

    fn tokenize(&self, sentence: &str) -> Result<Vec<String>, BackendError>;

    /// Part-of-speech tags aligned with `tokens`. `None` for tokenization-only
    /// providers.
    fn pos_tag(&self, _tokens: &[String]) -> Result<Option<Vec<PosTag>>, BackendError> {
        Ok(None)
    }
}

/// Probe outcome for a single provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendStatus {
    pub name: String,
    pub available: bool,
    pub detail: Option<String>,
}

/// Which optional providers loaded. Immutable once built.
#[derive(Default)]
pub struct EnhancementCapability {
    providers: Vec<Arc<dyn LinguisticBackend>>,
    statuses: Vec<BackendStatus>,
}

impl EnhancementCapability {
    /// No providers; the scorer uses its basic policy.
    pub fn none() -> Self {
        Self::default()
    }

    /// Probe each candidate in order. Failures are recorded, not raised.
    pub fn detect(candidates: Vec<Arc<dyn LinguisticBackend>>) -> Self {
        let mut providers = Vec::new();
        let mut statuses = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            let name = candidate.name();
            match candidate.probe() {
                Ok(()) => {
                    debug!(backend = name, "enhancement backend loaded");
                    statuses.push(BackendStatus {
                        name: name.to_string(),
                        available: true,
                        detail: None,
                    });
                    providers.push(candidate);
                }
                Err(e) => {
                    debug!(backend = name, error = %e, "enhancement backend unavailable");
                    statuses.push(BackendStatus {
                        name: name.to_string(),
                        available: false,
                        detail: Some(e.to_string()),
                    });
                }
            }
        }

        Self { providers, statuses }
    }

    pub fn has_enhanced(&self) -> bool {
        !self.providers.is_empty()
    }

    /// The most preferred provider that loaded.
    pub fn primary(&self) -> Option<&dyn LinguisticBackend> {
        self.providers.first().map(|p| p.as_ref())
    }

    pub fn statuses(&self) -> &[BackendStatus] {
        &self.statuses
    }
}

impl fmt::Debug for EnhancementCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.providers.iter().map(|p| p.name()).collect();
        f.debug_struct("EnhancementCapability")
            .field("providers", &names)
            .field("statuses", &self.statuses)
            .finish()
    }
}

static PROCESS_CAPABILITY: OnceCell<Arc<EnhancementCapability>> = OnceCell::new();

/// Detect capabilities once for the whole process.
///
/// The first caller's candidates win; later calls return the stored value
/// without probing again.
pub fn process_capability<F>(candidates: F) -> Arc<EnhancementCapability>
where
    F: FnOnce() -> Vec<Arc<dyn LinguisticBackend>>,
{
    PROCESS_CAPABILITY
        .get_or_init(|| {
            let capability = EnhancementCapability::detect(candidates());
            info!(
                enhanced = capability.has_enhanced(),
                probed = capability.statuses().len(),
                "enhancement probe finished"
            );
            Arc::new(capability)
        })
        .clone()
}

/// Build provider candidates from configured names, in the given order.
pub fn backends_from_names(
    names: &[String],
    morphology_lexicon: Option<&Path>,
) -> Vec<Arc<dyn LinguisticBackend>> {
    let mut backends: Vec<Arc<dyn LinguisticBackend>> = Vec::new();
    for name in names {
        match name.as_str() {
            ArabicMorphology::NAME => {
                let backend = match morphology_lexicon {
                    Some(path) => ArabicMorphology::with_lexicon(path),
                    None => ArabicMorphology::new(),
                };
                backends.push(Arc::new(backend));
            }
            UnicodeWords::NAME => backends.push(Arc::new(UnicodeWords)),
            other => warn!(backend = other, "unknown enhancement backend, skipping"),
        }
    }
    backends
}

/// Every built-in provider, most capable first.
pub fn default_backend_names() -> Vec<String> {
    vec![ArabicMorphology::NAME.to_string(), UnicodeWords::NAME.to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl LinguisticBackend for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn probe(&self) -> Result<(), BackendError> {
            Err(BackendError::Unavailable {
                backend: "failing",
                reason: "not installed".into(),
            })
        }

        fn tokenize(&self, _sentence: &str) -> Result<Vec<String>, BackendError> {
            unreachable!("never probed successfully")
        }
    }

    #[test]
    fn test_none_has_no_enhancement() {
        let capability = EnhancementCapability::none();
        assert!(!capability.has_enhanced());
        assert!(capability.primary().is_none());
        assert!(capability.statuses().is_empty());
    }

    #[test]
    fn test_detect_records_failures_silently() {
        let capability = EnhancementCapability::detect(vec![Arc::new(Failing)]);
        assert!(!capability.has_enhanced());
        assert_eq!(capability.statuses().len(), 1);
        assert!(!capability.statuses()[0].available);
        assert!(capability.statuses()[0].detail.is_some());
    }

    #[test]
    fn test_detect_keeps_preference_order() {
        let capability = EnhancementCapability::detect(vec![
            Arc::new(Failing),
            Arc::new(UnicodeWords),
            Arc::new(ArabicMorphology::new()),
        ]);
        assert!(capability.has_enhanced());
        assert_eq!(capability.primary().map(|p| p.name()), Some(UnicodeWords::NAME));
        let available: Vec<bool> = capability.statuses().iter().map(|s| s.available).collect();
        assert_eq!(available, vec![false, true, true]);
    }

    #[test]
    fn test_backends_from_names_skips_unknown() {
        let names = vec![
            "bogus".to_string(),
            UnicodeWords::NAME.to_string(),
            ArabicMorphology::NAME.to_string(),
        ];
        let backends = backends_from_names(&names, None);
        let got: Vec<&str> = backends.iter().map(|b| b.name()).collect();
        assert_eq!(got, vec![UnicodeWords::NAME, ArabicMorphology::NAME]);
    }

    #[test]
    fn test_missing_lexicon_fails_probe() {
        let backends = backends_from_names(
            &[ArabicMorphology::NAME.to_string()],
            Some(Path::new("/nonexistent/docsum/lexicon.txt")),
        );
        let capability = EnhancementCapability::detect(backends);
        assert!(!capability.has_enhanced());
    }
}
