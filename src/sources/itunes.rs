use std::sync::{Arc, Mutex};
use std::time::Duration;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::data::{Station, TrackMetadata};
use crate::helpers::http_client::HttpClient;
use crate::helpers::itunes::ItunesClient;
use crate::sources::{settle, MetadataSource, SourceError, SOURCE_TIMEOUT};

const NAME: &str = "itunes";

/// Results to pick from per search
pub const ROTATION_POOL: usize = 5;

/// Canned search terms per genre
pub fn search_terms(genre: &str) -> &'static [&'static str] {
    match genre.to_lowercase().as_str() {
        "pop" | "top40" => &["Taylor Swift", "Dua Lipa", "The Weeknd", "Olivia Rodrigo", "Harry Styles", "Sabrina Carpenter"],
        "rock" => &["Led Zeppelin", "Fleetwood Mac", "The Rolling Stones", "AC/DC", "Queen", "Tom Petty"],
        "metal" => &["Metallica", "Iron Maiden", "Slayer", "Megadeth", "Black Sabbath", "Judas Priest"],
        "country" => &["Luke Combs", "Morgan Wallen", "Chris Stapleton", "Kacey Musgraves", "Dolly Parton"],
        "hiphop" | "hip-hop" | "rap" => &["Kendrick Lamar", "Drake", "Missy Elliott", "OutKast", "J. Cole"],
        "dance" | "electronic" => &["Calvin Harris", "David Guetta", "Daft Punk", "Disclosure", "Fred again.."],
        _ => &["Top Hits", "Billboard Hot 100", "Greatest Hits"],
    }
}

/// Simulated now-playing data for stations without a live feed.
///
/// Searches iTunes for a genre term and reports a random song among the top
/// results. This is a plausible rotation, not what the station airs.
pub struct ItunesRotationSource {
    client: ItunesClient,
    genre: String,
    rng: Mutex<StdRng>,
}

impl ItunesRotationSource {
    pub fn new(http: Arc<dyn HttpClient>, genre: &str) -> Self {
        Self {
            client: ItunesClient::with_timeout(http, SOURCE_TIMEOUT),
            genre: genre.to_string(),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = ItunesClient::with_timeout(self.client_http(), timeout);
        self
    }

    /// Deterministic rotation
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    fn client_http(&self) -> Arc<dyn HttpClient> {
        self.client.http()
    }

    fn pick(&self, upper: usize) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen_range(0..upper)
    }

    fn try_fetch(&self, station: &Station) -> Result<TrackMetadata, SourceError> {
        let terms = search_terms(&self.genre);
        let term = terms[self.pick(terms.len())];

        let results = self.client.search(term, ROTATION_POOL)?;
        let usable: Vec<_> = results
            .into_iter()
            .filter(|r| r.track_name.is_some())
            .take(ROTATION_POOL)
            .collect();
        if usable.is_empty() {
            return Err(SourceError::NoTrack(format!("iTunes search '{}'", term)));
        }

        let chosen = &usable[self.pick(usable.len())];
        Ok(TrackMetadata::from_upstream(
            chosen.track_name.as_deref(),
            chosen.artist_name.as_deref(),
            chosen.collection_name.as_deref(),
            chosen.large_artwork().as_deref(),
            &station.name,
            NAME,
        ))
    }
}

impl MetadataSource for ItunesRotationSource {
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

    const FIVE_RESULTS: &str = r#"{"resultCount": 6, "results": [
        {"trackName": "One", "artistName": "A", "collectionName": "X", "artworkUrl100": "https://i/1/100x100bb.jpg"},
        {"trackName": "Two", "artistName": "A", "collectionName": "X", "artworkUrl100": "https://i/2/100x100bb.jpg"},
        {"trackName": "Three", "artistName": "A", "collectionName": "X", "artworkUrl100": "https://i/3/100x100bb.jpg"},
        {"trackName": "Four", "artistName": "A", "collectionName": "X", "artworkUrl100": "https://i/4/100x100bb.jpg"},
        {"trackName": "Five", "artistName": "A", "collectionName": "X", "artworkUrl100": "https://i/5/100x100bb.jpg"},
        {"trackName": "Six", "artistName": "A", "collectionName": "X", "artworkUrl100": "https://i/6/100x100bb.jpg"}
    ]}"#;

    #[test]
    fn test_picks_from_top_results() {
        let http = StubHttpClient::new().respond("itunes.apple.com/search", FIVE_RESULTS);
        let source = ItunesRotationSource::new(Arc::new(http.clone()), "pop").with_seed(7);
        let station = Station::new("hits", "Today's Hits", vec![]);

        for _ in 0..20 {
            let track = source.fetch(&station).unwrap();
            assert_ne!(track.title, "Six");
            assert_eq!(track.artist, "A");
            assert!(track.artwork.unwrap().contains("600x600"));
        }
        assert!(http.calls().iter().all(|url| url.contains("limit=5")));
    }

    #[test]
    fn test_same_seed_same_rotation() {
        let station = Station::new("hits", "Today's Hits", vec![]);
        let titles = |seed| {
            let http = StubHttpClient::new().respond("itunes.apple.com", FIVE_RESULTS);
            let source = ItunesRotationSource::new(Arc::new(http), "rock").with_seed(seed);
            (0..5).map(|_| source.fetch(&station).unwrap().title).collect::<Vec<_>>()
        };
        assert_eq!(titles(42), titles(42));
    }

    #[test]
    fn test_no_results() {
        let http = StubHttpClient::new().respond("itunes.apple.com", r#"{"resultCount": 0, "results": []}"#);
        let source = ItunesRotationSource::new(Arc::new(http), "country");
        assert!(source.fetch(&Station::new("country", "Country Roads", vec![])).is_none());
    }

    #[test]
    fn test_unknown_genre_has_terms() {
        assert!(!search_terms("polka").is_empty());
        assert_eq!(search_terms("Hip-Hop"), search_terms("rap"));
    }
}
