use std::sync::Arc;
use std::time::Duration;
use serde_json::Value;
use crate::data::{Station, TrackMetadata};
use crate::helpers::http_client::HttpClient;
use crate::sources::{probe_str, settle, MetadataSource, SourceError, SOURCE_TIMEOUT};

pub const DEFAULT_TRITON_BASE: &str = "https://np.tritondigital.com/public/nowplaying/json";

const NAME: &str = "triton";

/// Triton Digital / StreamTheWorld now-playing feed, keyed by call sign
#[derive(Debug, Clone)]
pub struct TritonSource {
    http: Arc<dyn HttpClient>,
    call_sign: String,
    base_url: String,
    timeout: Duration,
}

impl TritonSource {
    pub fn new(http: Arc<dyn HttpClient>, call_sign: &str) -> Self {
        Self {
            http,
            call_sign: call_sign.to_string(),
            base_url: DEFAULT_TRITON_BASE.to_string(),
            timeout: SOURCE_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn url(&self) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(&self.call_sign))
    }

    fn try_fetch(&self, station: &Station) -> Result<TrackMetadata, SourceError> {
        let url = self.url();
        let body = self.http.get_json(&url, self.timeout)?;
        let record = find_cue(&body).ok_or(SourceError::NoTrack(url))?;

        Ok(TrackMetadata::from_upstream(
            probe_str(record, &["cue_title"]).as_deref(),
            probe_str(record, &["cue_artist"]).as_deref(),
            probe_str(record, &["cue_album"]).as_deref(),
            probe_str(record, &["cue_image_url"]).as_deref(),
            &station.name,
            NAME,
        ))
    }
}

/// The cue record is either the root object or the first entry of a list
fn find_cue(body: &Value) -> Option<&Value> {
    let has_cue = |v: &Value| v.get("cue_title").is_some() || v.get("cue_artist").is_some();

    if has_cue(body) {
        return Some(body);
    }

    let list = match body {
        Value::Array(items) => Some(items),
        _ => ["nowplaying", "data"]
            .iter()
            .find_map(|key| body.get(*key).and_then(Value::as_array)),
    };

    list?.first().filter(|first| has_cue(*first))
}

impl MetadataSource for TritonSource {
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

    fn station() -> Station {
        Station::new("hits", "Today's Hits", vec![])
    }

    #[test]
    fn test_maps_cue_fields() {
        let http = StubHttpClient::new().respond(
            "/WHTZFM",
            r#"{"cue_title": "Espresso", "cue_artist": "Sabrina Carpenter", "cue_album": "Short n' Sweet", "cue_image_url": "https://img/espresso.jpg"}"#,
        );
        let source = TritonSource::new(Arc::new(http.clone()), "WHTZFM");
        let track = source.fetch(&station()).unwrap();
        assert_eq!(track.title, "Espresso");
        assert_eq!(track.artist, "Sabrina Carpenter");
        assert_eq!(track.album.as_deref(), Some("Short n' Sweet"));
        assert_eq!(track.artwork.as_deref(), Some("https://img/espresso.jpg"));
        assert_eq!(track.source, "triton");
        assert_eq!(http.calls(), vec![format!("{}/WHTZFM", DEFAULT_TRITON_BASE)]);
    }

    #[test]
    fn test_nested_list_and_null_fields() {
        let http = StubHttpClient::new().respond(
            "/WHTZFM",
            r#"{"nowplaying": [{"cue_title": "Station ID", "cue_artist": null}]}"#,
        );
        let source = TritonSource::new(Arc::new(http), "WHTZFM");
        let track = source.fetch(&station()).unwrap();
        assert_eq!(track.title, "Station ID");
        assert_eq!(track.artist, "Today's Hits");
        assert_eq!(track.album, None);
    }

    #[test]
    fn test_errors_become_none() {
        let source = TritonSource::new(Arc::new(StubHttpClient::new().fail("/WHTZFM", 500)), "WHTZFM");
        assert!(source.fetch(&station()).is_none());

        let source = TritonSource::new(Arc::new(StubHttpClient::new().respond("/WHTZFM", r#"{"status": "ok"}"#)), "WHTZFM");
        assert!(source.fetch(&station()).is_none());

        let source = TritonSource::new(Arc::new(StubHttpClient::new().respond("/WHTZFM", "<html>")), "WHTZFM");
        assert!(source.fetch(&station()).is_none());
    }

    #[test]
    fn test_custom_base_url() {
        let http = StubHttpClient::new().respond("np.local", r#"{"cue_title": "A", "cue_artist": "B"}"#);
        let source = TritonSource::new(Arc::new(http.clone()), "KISS FM").with_base_url("http://np.local/");
        assert!(source.fetch(&station()).is_some());
        assert_eq!(http.calls(), vec!["http://np.local/KISS%20FM".to_string()]);
    }
}
