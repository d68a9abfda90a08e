use std::fmt;
use std::time::Instant;
use serde::Serialize;

/// A now-playing record as reported by one metadata source
#[derive(Debug, Clone, Serialize)]
pub struct TrackMetadata {
    /// Track title, never empty
    pub title: String,

    /// Track artist, never empty
    pub artist: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,

    /// Artwork URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artwork: Option<String>,

    /// Filled in by the fetcher, sources leave it empty
    pub station_name: String,

    /// Name of the source that produced this record
    pub source: String,

    /// Set once an artwork lookup was tried, so nobody repeats it
    #[serde(skip)]
    pub artwork_looked_up: bool,

    /// When the source produced this record
    #[serde(skip)]
    pub fetched_at: Instant,
}

impl TrackMetadata {
    /// Build a record from raw upstream values.
    ///
    /// Missing or blank title and artist are replaced with `fallback`
    /// (usually the station name), blank album and artwork become `None`.
    pub fn from_upstream(
        title: Option<&str>,
        artist: Option<&str>,
        album: Option<&str>,
        artwork: Option<&str>,
        fallback: &str,
        source: &str,
    ) -> Self {
        Self {
            title: non_blank(title).unwrap_or_else(|| fallback.to_string()),
            artist: non_blank(artist).unwrap_or_else(|| fallback.to_string()),
            album: non_blank(album),
            artwork: non_blank(artwork),
            station_name: String::new(),
            source: source.to_string(),
            artwork_looked_up: false,
            fetched_at: Instant::now(),
        }
    }
}

impl PartialEq for TrackMetadata {
    fn eq(&self, other: &Self) -> bool {
        // fetched_at is bookkeeping only
        self.title == other.title
            && self.artist == other.artist
            && self.album == other.album
            && self.artwork == other.artwork
    }
}

impl fmt::Display for TrackMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} by {}", self.title, self.artist)?;
        if let Some(album) = &self.album {
            write!(f, " (Album: {})", album)?;
        }
        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_fall_back_to_station_name() {
        let track = TrackMetadata::from_upstream(None, Some("   "), None, None, "Groove Salad", "somafm");
        assert_eq!(track.title, "Groove Salad");
        assert_eq!(track.artist, "Groove Salad");
        assert!(track.album.is_none());
        assert!(track.artwork.is_none());
    }

    #[test]
    fn test_values_are_trimmed() {
        let track = TrackMetadata::from_upstream(
            Some(" Teardrop "),
            Some("Massive Attack"),
            Some(""),
            Some("https://img.example/a.jpg"),
            "Station",
            "triton",
        );
        assert_eq!(track.title, "Teardrop");
        assert_eq!(track.artist, "Massive Attack");
        assert_eq!(track.album, None);
        assert_eq!(track.artwork.as_deref(), Some("https://img.example/a.jpg"));
        assert_eq!(track.source, "triton");
        assert_eq!(track.to_string(), "Teardrop by Massive Attack");
    }
}
