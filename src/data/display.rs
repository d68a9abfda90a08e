use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Track fields as they are shown to the listener
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayContent {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub artwork: Option<String>,
    pub is_ad: bool,
}

/// The now-playing answer for one station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NowPlaying {
    pub station_id: String,
    pub station_name: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub artwork: Option<String>,
    pub is_ad: bool,
    pub timestamp: DateTime<Utc>,
}

impl NowPlaying {
    pub fn new(station_id: &str, station_name: &str, content: DisplayContent, timestamp: DateTime<Utc>) -> Self {
        Self {
            station_id: station_id.to_string(),
            station_name: station_name.to_string(),
            title: content.title,
            artist: content.artist,
            album: content.album,
            artwork: content.artwork,
            is_ad: content.is_ad,
            timestamp,
        }
    }

    /// The listener-facing part of this answer
    pub fn display_content(&self) -> DisplayContent {
        DisplayContent {
            title: self.title.clone(),
            artist: self.artist.clone(),
            album: self.album.clone(),
            artwork: self.artwork.clone(),
            is_ad: self.is_ad,
        }
    }
}
