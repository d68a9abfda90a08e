use std::sync::Arc;
use std::time::Duration;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};
use crate::classifier::{ClassifierError, FallibleClassifier, TrackQuery};
use crate::data::{AdType, ClassificationVerdict};
use crate::helpers::http_client::HttpClient;

const GEMINI_API_ROOT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

// Greedy on purpose: from the first '{' to the last '}'
static JSON_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"));

/// Settings for the language model classifier
#[derive(Debug, Clone, PartialEq)]
pub struct AiClassifierConfig {
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
    pub api_root: String,
}

impl AiClassifierConfig {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            api_root: GEMINI_API_ROOT.to_string(),
        }
    }
}

/// Classifier backed by a Gemini `generateContent` call
#[derive(Debug, Clone)]
pub struct AiClassifier {
    http: Arc<dyn HttpClient>,
    config: AiClassifierConfig,
}

impl AiClassifier {
    pub fn new(http: Arc<dyn HttpClient>, config: AiClassifierConfig) -> Self {
        Self { http, config }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            self.config.api_root.trim_end_matches('/'),
            self.config.model,
            urlencoding::encode(&self.config.api_key)
        )
    }
}

impl FallibleClassifier for AiClassifier {
    fn name(&self) -> &str {
        "gemini"
    }

    fn try_classify(&self, query: &TrackQuery) -> Result<ClassificationVerdict, ClassifierError> {
        if self.config.api_key.is_empty() {
            return Err(ClassifierError::Disabled("no API key".to_string()));
        }

        let payload = json!({
            "contents": [{ "parts": [{ "text": build_prompt(query) }] }],
            "generationConfig": { "temperature": 0.1 }
        });

        let response = self.http.post_json_value(&self.endpoint(), payload, self.config.timeout)?;
        let text = response_text(&response)
            .ok_or_else(|| ClassifierError::MissingVerdict("response has no candidate text".to_string()))?;
        debug!("Model answer for '{}': {}", query.title, text);
        parse_verdict(text)
    }
}

/// Classify a track with the language model, `None` on any failure
pub fn classify_with_ai(
    http: Arc<dyn HttpClient>,
    config: AiClassifierConfig,
    title: &str,
    artist: &str,
    album: &str,
    context: &str,
) -> Option<ClassificationVerdict> {
    let classifier = AiClassifier::new(http, config);
    match classifier.try_classify(&TrackQuery::new(title, artist, album, context)) {
        Ok(verdict) => Some(verdict),
        Err(e) => {
            debug!("AI classification of '{}' failed: {}", title, e);
            None
        }
    }
}

fn build_prompt(query: &TrackQuery) -> String {
    format!(
        "You are analysing now-playing metadata from an internet radio stream.\n\
         Decide whether the current item is music, a radio host segment, a commercial, \
         a promotion, a sponsorship, or political/campaign content that must be blocked.\n\n\
         Title: {}\n\
         Artist: {}\n\
         Album: {}\n\
         Context: {}\n\n\
         Answer with a single JSON object and nothing else, using exactly these fields:\n\
         {{\"isAd\": boolean, \"isBlocked\": boolean, \
         \"adType\": \"commercial\" | \"promotion\" | \"sponsorship\" | \"music\" | \"radio_host\" | \"blocked\" | \"unknown\", \
         \"brandName\": string or null, \"brandLogoUrl\": string or null, \
         \"confidence\": number between 0 and 1, \"reason\": string}}",
        query.title, query.artist, query.album, query.context
    )
}

fn response_text(response: &Value) -> Option<&str> {
    response
        .get("candidates")?
        .as_array()?
        .first()?
        .get("content")?
        .get("parts")?
        .as_array()?
        .iter()
        .find_map(|part| part.get("text").and_then(Value::as_str))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVerdict {
    #[serde(default)]
    is_ad: bool,
    #[serde(default)]
    is_blocked: bool,
    #[serde(default)]
    ad_type: Option<String>,
    #[serde(default)]
    brand_name: Option<String>,
    #[serde(default)]
    brand_logo_url: Option<String>,
    #[serde(default)]
    confidence: Option<f32>,
    #[serde(default)]
    reason: Option<String>,
}

/// Pull the first JSON object out of free text and turn it into a verdict
pub(crate) fn parse_verdict(text: &str) -> Result<ClassificationVerdict, ClassifierError> {
    let candidate = JSON_OBJECT
        .find(text)
        .ok_or_else(|| ClassifierError::MissingVerdict("no JSON object in answer".to_string()))?;

    let raw: RawVerdict = serde_json::from_str(candidate.as_str())
        .map_err(|e| ClassifierError::MalformedVerdict(e.to_string()))?;

    let ad_type = if raw.is_blocked {
        AdType::Blocked
    } else {
        raw.ad_type.as_deref().map(AdType::parse_lenient).unwrap_or_default()
    };

    Ok(ClassificationVerdict::from_parts(
        raw.is_ad || raw.is_blocked,
        raw.is_blocked,
        ad_type,
        raw.brand_name,
        raw.brand_logo_url,
        raw.confidence.unwrap_or(0.0),
        raw.reason.unwrap_or_default(),
    ))
}
