use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use log::trace;
use crate::data::NowPlaying;
use crate::helpers::clock::Clock;

/// Default time a now-playing answer stays valid
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

/// A cached answer for one station
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub data: NowPlaying,
    pub cached_at: Instant,
}

/// In-memory now-playing cache keyed by station id.
///
/// Entries are overwritten on refresh and never evicted; the station
/// catalogue is small and fixed.
pub struct MetadataCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MetadataCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The cached answer if it is younger than the TTL
    pub fn get_fresh(&self, station_id: &str) -> Option<NowPlaying> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let entry = entries.get(station_id)?;
        let age = self.clock.now().saturating_duration_since(entry.cached_at);
        if age < self.ttl {
            trace!("Cache hit for '{}' (age {:?})", station_id, age);
            Some(entry.data.clone())
        } else {
            trace!("Cache entry for '{}' expired (age {:?})", station_id, age);
            None
        }
    }

    /// Store an answer, replacing any previous one
    pub fn insert(&self, station_id: &str, data: NowPlaying) {
        let entry = CacheEntry {
            data,
            cached_at: self.clock.now(),
        };
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(station_id.to_string(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DisplayContent;
    use crate::helpers::clock::ManualClock;

    fn answer(title: &str) -> NowPlaying {
        let content = DisplayContent {
            title: title.to_string(),
            artist: "Artist".to_string(),
            album: String::new(),
            artwork: None,
            is_ad: false,
        };
        NowPlaying::new("metal", "Metal Detector", content, chrono::Utc::now())
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let clock = Arc::new(ManualClock::new());
        let cache = MetadataCache::new(DEFAULT_TTL, clock.clone());
        assert!(cache.get_fresh("metal").is_none());

        cache.insert("metal", answer("One"));
        clock.advance(Duration::from_secs(29));
        assert_eq!(cache.get_fresh("metal").unwrap().title, "One");

        clock.advance(Duration::from_secs(1));
        assert!(cache.get_fresh("metal").is_none());
        // expired entries stay until overwritten
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_insert_overwrites() {
        let clock = Arc::new(ManualClock::new());
        let cache = MetadataCache::new(DEFAULT_TTL, clock.clone());
        cache.insert("metal", answer("One"));
        clock.advance(Duration::from_secs(40));
        cache.insert("metal", answer("Two"));
        assert_eq!(cache.get_fresh("metal").unwrap().title, "Two");
        assert_eq!(cache.len(), 1);
    }
}
