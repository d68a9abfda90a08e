use std::sync::Arc;
use std::time::Duration;
use log::debug;
use serde_json::Value;
use crate::data::{Station, TrackMetadata};
use crate::helpers::http_client::HttpClient;
use crate::helpers::itunes::ArtworkLookup;
use crate::sources::{probe_str, settle, MetadataSource, SourceError, SOURCE_TIMEOUT};

const NAME: &str = "somafm";

/// Endpoint templates, tried in order; `{channel}` is replaced
const ENDPOINTS: &[&str] = &[
    "https://somafm.com/songs/{channel}.json",
    "https://api.somafm.com/songs/{channel}.json",
    "https://somafm.com/nowplaying/{channel}.json",
];

/// SomaFM channel playlist feeds
pub struct SomaFmSource {
    http: Arc<dyn HttpClient>,
    artwork: Arc<dyn ArtworkLookup>,
    channel: String,
    timeout: Duration,
}

impl SomaFmSource {
    pub fn new(http: Arc<dyn HttpClient>, artwork: Arc<dyn ArtworkLookup>, channel: &str) -> Self {
        Self {
            http,
            artwork,
            channel: channel.to_string(),
            timeout: SOURCE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoints(&self) -> impl Iterator<Item = String> + '_ {
        ENDPOINTS.iter().map(move |t| t.replace("{channel}", &self.channel))
    }

    fn try_fetch(&self, station: &Station) -> Result<TrackMetadata, SourceError> {
        for url in self.endpoints() {
            let body = match self.http.get_json(&url, self.timeout) {
                Ok(body) => body,
                Err(e) => {
                    debug!("somafm: {} failed: {}", url, e);
                    continue;
                }
            };

            let Some(song) = latest_song(&body) else {
                debug!("somafm: no song in {}", url);
                continue;
            };

            let mut track = TrackMetadata::from_upstream(
                probe_str(song, &["title"]).as_deref(),
                probe_str(song, &["artist"]).as_deref(),
                probe_str(song, &["album"]).as_deref(),
                probe_str(song, &["albumart", "image"]).as_deref(),
                &station.name,
                NAME,
            );

            if track.artwork.is_none() {
                track.artwork = self.artwork.fetch_artwork(&track.title, &track.artist);
                track.artwork_looked_up = true;
            }
            return Ok(track);
        }

        Err(SourceError::Exhausted(ENDPOINTS.len()))
    }
}

/// The most recent song: first entry of `songs`, of a bare array, or the
/// root object itself
fn latest_song(body: &Value) -> Option<&Value> {
    let candidate = match body {
        Value::Array(items) => items.first(),
        Value::Object(_) => match body.get("songs").and_then(Value::as_array) {
            Some(songs) => songs.first(),
            None => Some(body),
        },
        _ => None,
    }?;

    if candidate.get("title").is_some() || candidate.get("artist").is_some() {
        Some(candidate)
    } else {
        None
    }
}

impl MetadataSource for SomaFmSource {
    fn name(&self) -> &str {
        NAME
    }

    fn fetch(&self, station: &Station) -> Option<TrackMetadata> {
        settle(NAME, station, self.try_fetch(station))
    }
}
