//! Ad / blocked content detection for now-playing metadata.
//!
//! Two tiers: a fallible primary classifier (the language model call in
//! [`ai`]) and the total keyword classifier in [`keyword`], combined by
//! [`TryInOrder`].

pub mod ai;
pub mod display;
pub mod keyword;
pub mod tables;

use log::{debug, warn};
use thiserror::Error;
use crate::data::ClassificationVerdict;
use crate::helpers::http_client::HttpClientError;

pub use ai::{classify_with_ai, AiClassifier, AiClassifierConfig};
pub use display::to_display_content;
pub use keyword::{classify, KeywordClassifier};

/// Confidence a primary verdict needs to be accepted
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.7;

/// The fields a classifier looks at
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackQuery {
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Free-form context, usually the station name
    pub context: String,
}

impl TrackQuery {
    pub fn new(title: &str, artist: &str, album: &str, context: &str) -> Self {
        Self {
            title: title.to_string(),
            artist: artist.to_string(),
            album: album.to_string(),
            context: context.to_string(),
        }
    }
}

/// Errors from a fallible classifier
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier is disabled: {0}")]
    Disabled(String),

    #[error("request failed: {0}")]
    Http(#[from] HttpClientError),

    #[error("no verdict in response: {0}")]
    MissingVerdict(String),

    #[error("malformed verdict: {0}")]
    MalformedVerdict(String),
}

/// A classifier that always produces a verdict
pub trait Classifier: Send + Sync {
    fn name(&self) -> &str;

    fn classify(&self, query: &TrackQuery) -> ClassificationVerdict;
}

/// A classifier that may fail (network, rate limits, garbage answers)
pub trait FallibleClassifier: Send + Sync {
    fn name(&self) -> &str;

    fn try_classify(&self, query: &TrackQuery) -> Result<ClassificationVerdict, ClassifierError>;
}

/// Ask the primary classifier first and fall back to a total classifier when
/// it fails or isn't confident enough.
pub struct TryInOrder {
    primary: Option<Box<dyn FallibleClassifier>>,
    fallback: Box<dyn Classifier>,
    min_confidence: f32,
}

impl TryInOrder {
    pub fn new(primary: Box<dyn FallibleClassifier>, fallback: Box<dyn Classifier>) -> Self {
        Self {
            primary: Some(primary),
            fallback,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }

    /// Only the fallback, no primary tier
    pub fn fallback_only(fallback: Box<dyn Classifier>) -> Self {
        Self {
            primary: None,
            fallback,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }

    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence;
        self
    }
}

impl Classifier for TryInOrder {
    fn name(&self) -> &str {
        "try-in-order"
    }

    fn classify(&self, query: &TrackQuery) -> ClassificationVerdict {
        if let Some(primary) = &self.primary {
            match primary.try_classify(query) {
                Ok(verdict) if verdict.confidence > self.min_confidence => {
                    debug!("{} classified '{}' as {} ({:.2})", primary.name(), query.title, verdict.ad_type, verdict.confidence);
                    return verdict;
                }
                Ok(verdict) => {
                    debug!(
                        "{} verdict for '{}' too uncertain ({:.2}), using {}",
                        primary.name(), query.title, verdict.confidence, self.fallback.name()
                    );
                }
                Err(ClassifierError::Disabled(_)) => {}
                Err(e) => {
                    warn!("{} failed for '{}': {}, using {}", primary.name(), query.title, e, self.fallback.name());
                }
            }
        }
        self.fallback.classify(query)
    }
}

/// Build the standard two-tier classifier
pub fn build_classifier(ai: Option<AiClassifier>, min_confidence: f32) -> TryInOrder {
    let fallback: Box<dyn Classifier> = Box::new(KeywordClassifier::new());
    match ai {
        Some(ai) => TryInOrder::new(Box::new(ai), fallback).with_min_confidence(min_confidence),
        None => TryInOrder::fallback_only(fallback),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::AdType;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FixedPrimary {
        result: fn() -> Result<ClassificationVerdict, ClassifierError>,
        calls: Arc<AtomicUsize>,
    }

    impl FallibleClassifier for FixedPrimary {
        fn name(&self) -> &str {
            "fixed"
        }

        fn try_classify(&self, _query: &TrackQuery) -> Result<ClassificationVerdict, ClassifierError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.result)()
        }
    }

    fn combined(result: fn() -> Result<ClassificationVerdict, ClassifierError>) -> (TryInOrder, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let primary = FixedPrimary { result, calls: calls.clone() };
        (TryInOrder::new(Box::new(primary), Box::new(KeywordClassifier::new())), calls)
    }

    #[test]
    fn test_confident_primary_wins() {
        let (classifier, calls) = combined(|| Ok(ClassificationVerdict::radio_host(0.95, "model")));
        let verdict = classifier.classify(&TrackQuery::new("Gain Commercial", "", "", ""));
        assert_eq!(verdict.ad_type, AdType::RadioHost);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_uncertain_primary_falls_back() {
        // exactly at the threshold is not enough
        let (classifier, _) = combined(|| Ok(ClassificationVerdict::music(0.7, "model")));
        let verdict = classifier.classify(&TrackQuery::new("Gain Commercial", "", "", ""));
        assert_eq!(verdict.ad_type, AdType::Commercial);
        assert_eq!(verdict.brand_name.as_deref(), Some("Gain"));
    }

    #[test]
    fn test_failing_primary_falls_back() {
        let (classifier, calls) = combined(|| Err(ClassifierError::MissingVerdict("nothing".to_string())));
        let verdict = classifier.classify(&TrackQuery::new("MAGA Rally Ad", "Political Committee", "", ""));
        assert!(verdict.is_blocked);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_fallback_only() {
        let classifier = build_classifier(None, DEFAULT_MIN_CONFIDENCE);
        let verdict = classifier.classify(&TrackQuery::new("Teardrop", "Massive Attack", "Mezzanine", "Groove Salad"));
        assert_eq!(verdict.ad_type, AdType::Music);
    }
}
