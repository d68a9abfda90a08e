use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Kind of content a track was classified as
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AdType {
    Commercial,
    Promotion,
    Sponsorship,
    Music,
    RadioHost,
    Blocked,
    #[default]
    Unknown,
}

impl AdType {
    /// Parse a type name, mapping anything unrecognised to `Unknown`
    pub fn parse_lenient(value: &str) -> Self {
        value.trim().parse().unwrap_or(AdType::Unknown)
    }
}

/// Result of classifying a track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationVerdict {
    pub is_ad: bool,

    /// Blocked content is suppressed entirely and never labelled as an ad
    pub is_blocked: bool,

    pub ad_type: AdType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_logo_url: Option<String>,

    /// Always within [0, 1]
    pub confidence: f32,

    /// Rationale for logs, never shown to listeners
    pub reason: String,
}

impl ClassificationVerdict {
    fn new(is_ad: bool, is_blocked: bool, ad_type: AdType, confidence: f32, reason: impl Into<String>) -> Self {
        Self {
            is_ad,
            is_blocked,
            ad_type,
            brand_name: None,
            brand_logo_url: None,
            confidence: clamp_confidence(confidence),
            reason: reason.into(),
        }
    }

    pub fn blocked(confidence: f32, reason: impl Into<String>) -> Self {
        Self::new(true, true, AdType::Blocked, confidence, reason)
    }

    pub fn commercial(confidence: f32, reason: impl Into<String>) -> Self {
        Self::new(true, false, AdType::Commercial, confidence, reason)
    }

    pub fn radio_host(confidence: f32, reason: impl Into<String>) -> Self {
        Self::new(false, false, AdType::RadioHost, confidence, reason)
    }

    pub fn music(confidence: f32, reason: impl Into<String>) -> Self {
        Self::new(false, false, AdType::Music, confidence, reason)
    }

    /// Attach brand details to a verdict
    pub fn with_brand(mut self, name: &str, logo_url: &str) -> Self {
        self.brand_name = Some(name.to_string());
        self.brand_logo_url = Some(logo_url.to_string());
        self
    }

    /// Build a verdict from untrusted values, clamping confidence into range
    pub fn from_parts(
        is_ad: bool,
        is_blocked: bool,
        ad_type: AdType,
        brand_name: Option<String>,
        brand_logo_url: Option<String>,
        confidence: f32,
        reason: String,
    ) -> Self {
        Self {
            is_ad,
            is_blocked,
            ad_type,
            brand_name: brand_name.filter(|b| !b.trim().is_empty()),
            brand_logo_url: brand_logo_url.filter(|u| !u.trim().is_empty()),
            confidence: clamp_confidence(confidence),
            reason,
        }
    }
}

fn clamp_confidence(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ad_type_parsing() {
        assert_eq!(AdType::parse_lenient("commercial"), AdType::Commercial);
        assert_eq!(AdType::parse_lenient("RADIO_HOST"), AdType::RadioHost);
        assert_eq!(AdType::parse_lenient(" blocked "), AdType::Blocked);
        assert_eq!(AdType::parse_lenient("jingle"), AdType::Unknown);
        assert_eq!(AdType::RadioHost.to_string(), "radio_host");
        assert_eq!(AdType::default(), AdType::Unknown);
    }

    #[test]
    fn test_confidence_is_clamped() {
        let verdict = ClassificationVerdict::from_parts(
            false, false, AdType::Music, None, None, 1.7, String::new(),
        );
        assert_eq!(verdict.confidence, 1.0);

        let verdict = ClassificationVerdict::from_parts(
            false, false, AdType::Music, None, None, f32::NAN, String::new(),
        );
        assert_eq!(verdict.confidence, 0.0);
    }

    #[test]
    fn test_serializes_camel_case() {
        let verdict = ClassificationVerdict::commercial(0.85, "brand match").with_brand("Gain", "https://logo/gain.png");
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["isAd"], true);
        assert_eq!(json["adType"], "commercial");
        assert_eq!(json["brandName"], "Gain");
    }
}
