// Common helpers for integration tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use serde_json::Value;
use onair::data::{Station, TrackMetadata};
use onair::helpers::http_client::{HttpClient, HttpClientError};
use onair::sources::MetadataSource;

/// HTTP client serving canned bodies by URL substring, first match wins
#[derive(Clone, Debug, Default)]
pub struct FakeHttp {
    routes: Arc<Mutex<Vec<(String, Result<String, u16>)>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, url_part: &str, body: &str) -> Self {
        self.routes.lock().unwrap().push((url_part.to_string(), Ok(body.to_string())));
        self
    }

    pub fn fail(self, url_part: &str, status: u16) -> Self {
        self.routes.lock().unwrap().push((url_part.to_string(), Err(status)));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, url_part: &str) -> usize {
        self.calls().iter().filter(|url| url.contains(url_part)).count()
    }

    fn lookup(&self, url: &str) -> Result<String, HttpClientError> {
        self.calls.lock().unwrap().push(url.to_string());
        let routes = self.routes.lock().unwrap();
        match routes.iter().find(|(part, _)| url.contains(part.as_str())) {
            Some((_, Ok(body))) => Ok(body.clone()),
            Some((_, Err(status))) => Err(HttpClientError::StatusError(*status)),
            None => Err(HttpClientError::RequestError(format!("no route for {}", url))),
        }
    }
}

impl HttpClient for FakeHttp {
    fn post_json_value(&self, url: &str, _payload: Value, _timeout: Duration) -> Result<Value, HttpClientError> {
        let body = self.lookup(url)?;
        serde_json::from_str(&body).map_err(|e| HttpClientError::ParseError(e.to_string()))
    }

    fn get_text(&self, url: &str, _timeout: Duration) -> Result<String, HttpClientError> {
        self.lookup(url)
    }

    fn clone_box(&self) -> Box<dyn HttpClient> {
        Box::new(self.clone())
    }
}

/// Source returning a fixed track and counting how often it was asked
pub struct CountingSource {
    track: Option<(String, String, Option<String>)>,
    delay: Duration,
    calls: AtomicUsize,
}

impl CountingSource {
    pub fn new(title: &str, artist: &str) -> Arc<Self> {
        Arc::new(Self {
            track: Some((title.to_string(), artist.to_string(), None)),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn with_artwork(title: &str, artist: &str, artwork: &str) -> Arc<Self> {
        Arc::new(Self {
            track: Some((title.to_string(), artist.to_string(), Some(artwork.to_string()))),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        })
    }

    /// Answers after `delay`
    pub fn slow(title: &str, artist: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            track: Some((title.to_string(), artist.to_string(), None)),
            delay,
            calls: AtomicUsize::new(0),
        })
    }

    /// Never has anything
    pub fn empty() -> Arc<Self> {
        Arc::new(Self {
            track: None,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MetadataSource for CountingSource {
    fn name(&self) -> &str {
        "counting"
    }

    fn fetch(&self, station: &Station) -> Option<TrackMetadata> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        let (title, artist, artwork) = self.track.as_ref()?;
        Some(TrackMetadata::from_upstream(
            Some(title.as_str()),
            Some(artist.as_str()),
            None,
            artwork.as_deref(),
            &station.name,
            "counting",
        ))
    }
}

pub fn station(id: &str, name: &str) -> Station {
    Station::new(id, name, vec![])
}

/// iTunes search answer with one song
pub fn itunes_one(title: &str, artist: &str, artwork: &str) -> String {
    serde_json::json!({
        "resultCount": 1,
        "results": [ { "trackName": title, "artistName": artist, "collectionName": "Album", "artworkUrl100": artwork } ]
    })
    .to_string()
}
