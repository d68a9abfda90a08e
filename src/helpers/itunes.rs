use std::sync::Arc;
use std::time::Duration;
use log::debug;
use serde::Deserialize;
use crate::helpers::http_client::{HttpClient, HttpClientError};

const ITUNES_SEARCH_URL: &str = "https://itunes.apple.com/search";

/// Default timeout for artwork lookups
pub const ARTWORK_TIMEOUT: Duration = Duration::from_secs(3);

/// Something that can find cover art for a song
pub trait ArtworkLookup: Send + Sync {
    /// Returns an artwork URL, `None` when nothing was found or the lookup failed
    fn fetch_artwork(&self, title: &str, artist: &str) -> Option<String>;
}

/// Artwork lookup that never finds anything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoArtwork;

impl ArtworkLookup for NoArtwork {
    fn fetch_artwork(&self, _title: &str, _artist: &str) -> Option<String> {
        None
    }
}

/// One song from an iTunes search
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItunesTrack {
    pub track_name: Option<String>,
    pub artist_name: Option<String>,
    pub collection_name: Option<String>,
    pub artwork_url100: Option<String>,
}

impl ItunesTrack {
    /// Artwork URL scaled up to 600x600
    pub fn large_artwork(&self) -> Option<String> {
        self.artwork_url100.as_deref().map(upsize_artwork)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<ItunesTrack>,
}

/// Rewrite the 100x100 artwork path segment to 600x600
pub fn upsize_artwork(url: &str) -> String {
    url.replace("100x100", "600x600")
}

/// Minimal iTunes Search API client
#[derive(Debug, Clone)]
pub struct ItunesClient {
    http: Arc<dyn HttpClient>,
    timeout: Duration,
}

impl ItunesClient {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self::with_timeout(http, ARTWORK_TIMEOUT)
    }

    pub fn with_timeout(http: Arc<dyn HttpClient>, timeout: Duration) -> Self {
        Self { http, timeout }
    }

    pub fn http(&self) -> Arc<dyn HttpClient> {
        self.http.clone()
    }

    /// Search for songs matching `term`
    pub fn search(&self, term: &str, limit: usize) -> Result<Vec<ItunesTrack>, HttpClientError> {
        self.search_with_timeout(term, limit, self.timeout)
    }

    pub fn search_with_timeout(&self, term: &str, limit: usize, timeout: Duration) -> Result<Vec<ItunesTrack>, HttpClientError> {
        let url = format!(
            "{}?term={}&media=music&entity=song&limit={}",
            ITUNES_SEARCH_URL,
            urlencoding::encode(term),
            limit
        );
        let value = self.http.get_json(&url, timeout)?;
        let response: SearchResponse = serde_json::from_value(value)
            .map_err(|e| HttpClientError::ParseError(e.to_string()))?;
        Ok(response.results)
    }
}

impl ArtworkLookup for ItunesClient {
    fn fetch_artwork(&self, title: &str, artist: &str) -> Option<String> {
        let term = format!("{} {}", artist, title);
        match self.search(term.trim(), 1) {
            Ok(results) => {
                let artwork = results.first().and_then(ItunesTrack::large_artwork);
                if artwork.is_none() {
                    debug!("iTunes: no artwork for '{}' by '{}'", title, artist);
                }
                artwork
            }
            Err(e) => {
                debug!("iTunes: artwork lookup for '{}' by '{}' failed: {}", title, artist, e);
                None
            }
        }
    }
}
