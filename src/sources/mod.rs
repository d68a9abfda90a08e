//! Upstream now-playing providers.
//!
//! Every source turns a provider-specific JSON document into a
//! [`TrackMetadata`]. Sources never fail loudly: errors are logged and the
//! source answers `None` so the next source in the station's chain is tried.

pub mod alternative;
pub mod itunes;
pub mod somafm;
pub mod triton;

use std::sync::Arc;
use std::time::Duration;
use log::debug;
use serde_json::Value;
use thiserror::Error;
use crate::data::{SourceConfig, Station, TrackMetadata};
use crate::helpers::http_client::{HttpClient, HttpClientError};
use crate::helpers::itunes::ArtworkLookup;

pub use alternative::AlternativeSource;
pub use itunes::ItunesRotationSource;
pub use somafm::SomaFmSource;
pub use triton::TritonSource;

/// Default per-request timeout for now-playing endpoints
pub const SOURCE_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors raised inside a source; they never leave it
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{0}")]
    Http(#[from] HttpClientError),

    #[error("no track in response from {0}")]
    NoTrack(String),

    #[error("all {0} endpoints failed")]
    Exhausted(usize),
}

/// A provider of now-playing data
pub trait MetadataSource: Send + Sync {
    /// Short name used in logs and in `TrackMetadata::source`
    fn name(&self) -> &str;

    /// Current track for `station`, `None` on any failure
    fn fetch(&self, station: &Station) -> Option<TrackMetadata>;
}

/// Shared dependencies for building sources from configuration
#[derive(Clone)]
pub struct SourceContext {
    pub http: Arc<dyn HttpClient>,
    pub artwork: Arc<dyn ArtworkLookup>,
    pub timeout: Duration,
    pub triton_base: String,
    /// Seed for the iTunes rotation, random when `None`
    pub rotation_seed: Option<u64>,
}

impl SourceContext {
    pub fn new(http: Arc<dyn HttpClient>, artwork: Arc<dyn ArtworkLookup>) -> Self {
        Self {
            http,
            artwork,
            timeout: SOURCE_TIMEOUT,
            triton_base: triton::DEFAULT_TRITON_BASE.to_string(),
            rotation_seed: None,
        }
    }
}

/// Instantiate the source described by `config`
pub fn build_source(config: &SourceConfig, ctx: &SourceContext) -> Arc<dyn MetadataSource> {
    match config {
        SourceConfig::Triton { call_sign } => Arc::new(
            TritonSource::new(ctx.http.clone(), call_sign)
                .with_base_url(&ctx.triton_base)
                .with_timeout(ctx.timeout),
        ),
        SourceConfig::Somafm { channel } => Arc::new(
            SomaFmSource::new(ctx.http.clone(), ctx.artwork.clone(), channel).with_timeout(ctx.timeout),
        ),
        SourceConfig::Alternative { endpoints } => Arc::new(
            AlternativeSource::new(ctx.http.clone(), endpoints.clone()).with_timeout(ctx.timeout),
        ),
        SourceConfig::Itunes { genre } => {
            let source = ItunesRotationSource::new(ctx.http.clone(), genre).with_timeout(ctx.timeout);
            Arc::new(match ctx.rotation_seed {
                Some(seed) => source.with_seed(seed),
                None => source,
            })
        }
    }
}

/// Instantiate a station's whole fallback chain
pub fn build_chain(station: &Station, ctx: &SourceContext) -> Vec<Arc<dyn MetadataSource>> {
    let chain: Vec<Arc<dyn MetadataSource>> = station.sources.iter().map(|c| build_source(c, ctx)).collect();
    debug!(
        "Station '{}' uses sources [{}]",
        station.id,
        station.sources.iter().map(SourceConfig::kind).collect::<Vec<_>>().join(", ")
    );
    chain
}

/// Log a source error and turn the result into an option
pub(crate) fn settle(source: &str, station: &Station, result: Result<TrackMetadata, SourceError>) -> Option<TrackMetadata> {
    match result {
        Ok(track) => {
            debug!("{}: '{}' is playing {}", source, station.id, track);
            Some(track)
        }
        Err(e) => {
            debug!("{}: no metadata for '{}': {}", source, station.id, e);
            None
        }
    }
}

/// First non-empty string among `keys` on `value`.
///
/// Numbers are accepted and stringified, objects with a `name` or `title`
/// field are unwrapped (`"artist": {"name": "..."}`).
pub(crate) fn probe_str(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match value.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(inner) => inner
            .get("name")
            .or_else(|| inner.get("title"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        _ => None,
    })
}
