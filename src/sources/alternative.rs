use std::sync::Arc;
use std::time::Duration;
use log::{debug, warn};
use serde_json::Value;
use crate::data::{Station, TrackMetadata};
use crate::helpers::http_client::HttpClient;
use crate::sources::{probe_str, settle, MetadataSource, SourceError, SOURCE_TIMEOUT};

const NAME: &str = "alternative";

/// At most this many endpoints are tried per fetch
pub const MAX_ENDPOINTS: usize = 3;

const RECORD_KEYS: &[&str] = &["track", "now_playing", "nowPlaying", "current_track", "currentTrack", "song", "data"];
const LIST_KEYS: &[&str] = &["tracks", "songs", "results", "data", "items"];

const TITLE_KEYS: &[&str] = &["title", "song", "name", "track", "track_title"];
const ARTIST_KEYS: &[&str] = &["artist", "artist_name", "artistName", "performer", "singer"];
const ALBUM_KEYS: &[&str] = &["album", "album_name", "albumName", "release"];
const ARTWORK_KEYS: &[&str] = &[
    "artwork", "artwork_url", "artworkUrl", "image", "image_url", "imageUrl", "cover", "cover_url", "coverUrl", "albumart",
];

/// Generic JSON now-playing APIs with unknown, differing schemas.
///
/// Each endpoint template may contain `{station}`, which is replaced with
/// the station id.
pub struct AlternativeSource {
    http: Arc<dyn HttpClient>,
    endpoints: Vec<String>,
    timeout: Duration,
}

impl AlternativeSource {
    pub fn new(http: Arc<dyn HttpClient>, endpoints: Vec<String>) -> Self {
        if endpoints.len() > MAX_ENDPOINTS {
            warn!("Only the first {} of {} alternative endpoints will be used", MAX_ENDPOINTS, endpoints.len());
        }
        Self {
            http,
            endpoints,
            timeout: SOURCE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn try_fetch(&self, station: &Station) -> Result<TrackMetadata, SourceError> {
        let mut tried = 0;
        for template in self.endpoints.iter().take(MAX_ENDPOINTS) {
            tried += 1;
            let url = template.replace("{station}", &urlencoding::encode(&station.id));
            match self.http.get_json(&url, self.timeout) {
                Ok(body) => match parse_track(&body, &station.name) {
                    Some(track) => return Ok(track),
                    None => debug!("alternative: no usable track in {}", url),
                },
                Err(e) => debug!("alternative: {} failed: {}", url, e),
            }
        }
        Err(SourceError::Exhausted(tried))
    }
}

/// Locate the track record inside an arbitrary document
fn find_record(body: &Value) -> &Value {
    let nested = RECORD_KEYS
        .iter()
        .filter_map(|key| body.get(*key))
        .find(|v| v.is_object());
    if let Some(record) = nested {
        return record;
    }

    let listed = LIST_KEYS
        .iter()
        .filter_map(|key| body.get(*key).and_then(Value::as_array))
        .find_map(|items| items.first());
    if let Some(record) = listed {
        return record;
    }

    match body {
        Value::Array(items) => items.first().unwrap_or(body),
        _ => body,
    }
}

fn parse_track(body: &Value, fallback: &str) -> Option<TrackMetadata> {
    let record = find_record(body);

    let mut title = probe_str(record, TITLE_KEYS);
    let mut artist = probe_str(record, ARTIST_KEYS);

    // "Artist - Title" in a single field
    if artist.is_none() {
        if let Some((a, t)) = title.as_deref().and_then(|t| t.split_once(" - ")) {
            artist = Some(a.trim().to_string());
            title = Some(t.trim().to_string());
        }
    }

    if title.is_none() && artist.is_none() {
        return None;
    }

    Some(TrackMetadata::from_upstream(
        title.as_deref(),
        artist.as_deref(),
        probe_str(record, ALBUM_KEYS).as_deref(),
        probe_str(record, ARTWORK_KEYS).as_deref(),
        fallback,
        NAME,
    ))
}

impl MetadataSource for AlternativeSource {
    fn name(&self) -> &str {
        NAME
    }

    fn fetch(&self, station: &Station) -> Option<TrackMetadata> {
        settle(NAME, station, self.try_fetch(station))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::http_client::stub::StubHttpClient;
    use serde_json::json;

    #[test]
    fn test_nested_track_object() {
        let body = json!({"track": {"song": "Heroes", "artist": {"name": "David Bowie"}, "cover": "https://c/heroes.jpg"}});
        let track = parse_track(&body, "Station").unwrap();
        assert_eq!(track.title, "Heroes");
        assert_eq!(track.artist, "David Bowie");
        assert_eq!(track.artwork.as_deref(), Some("https://c/heroes.jpg"));
    }

    #[test]
    fn test_list_shape() {
        let body = json!({"results": [{"name": "Hyperballad", "performer": "Bjork", "release": "Post"}]});
        let track = parse_track(&body, "Station").unwrap();
        assert_eq!(track.title, "Hyperballad");
        assert_eq!(track.artist, "Bjork");
        assert_eq!(track.album.as_deref(), Some("Post"));
    }

    #[test]
    fn test_combined_artist_title() {
        let body = json!({"current_track": {"title": "Portishead - Roads", "artwork_url": "https://a/roads.jpg"}});
        let track = parse_track(&body, "Station").unwrap();
        assert_eq!(track.artist, "Portishead");
        assert_eq!(track.title, "Roads");
    }

    #[test]
    fn test_root_shape_with_string_song_field() {
        let body = json!({"song": "Karma Police", "artist_name": "Radiohead"});
        let track = parse_track(&body, "Station").unwrap();
        assert_eq!(track.title, "Karma Police");
        assert_eq!(track.artist, "Radiohead");
    }

    #[test]
    fn test_nothing_usable() {
        assert!(parse_track(&json!({"status": "offline"}), "Station").is_none());
        assert!(parse_track(&json!([]), "Station").is_none());
    }

    #[test]
    fn test_tries_endpoints_in_order() {
        let http = StubHttpClient::new()
            .fail("first.example", 502)
            .respond("second.example", r#"{"status": "ok"}"#)
            .respond("third.example", r#"{"now_playing": {"title": "Windowlicker", "artist": "Aphex Twin"}}"#)
            .respond("fourth.example", r#"{"title": "Never", "artist": "Reached"}"#);
        let source = AlternativeSource::new(
            Arc::new(http.clone()),
            vec![
                "https://first.example/{station}".to_string(),
                "https://second.example/np?id={station}".to_string(),
                "https://third.example/{station}.json".to_string(),
                "https://fourth.example/{station}".to_string(),
            ],
        );
        let station = Station::new("indie", "Indie Pop Rocks", vec![]);
        let track = source.fetch(&station).unwrap();
        assert_eq!(track.title, "Windowlicker");
        assert_eq!(
            http.calls(),
            vec![
                "https://first.example/indie".to_string(),
                "https://second.example/np?id=indie".to_string(),
                "https://third.example/indie.json".to_string(),
            ]
        );
    }
}
