use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use log::{debug, info, warn};
use crate::classifier::{build_classifier, to_display_content, AiClassifier, AiClassifierConfig, Classifier, TrackQuery};
use crate::config::AppConfig;
use crate::data::{NowPlaying, Station, TrackMetadata};
use crate::helpers::clock::{Clock, SystemClock};
use crate::helpers::http_client::HttpClient;
use crate::helpers::itunes::{ArtworkLookup, ItunesClient, NoArtwork};
use crate::metadata::cache::{MetadataCache, DEFAULT_TTL};
use crate::sources::{build_chain, MetadataSource, SourceContext};

struct StationEntry {
    station: Station,
    sources: Vec<Arc<dyn MetadataSource>>,
    /// Held while an upstream fetch for this station is running
    in_flight: Mutex<()>,
}

/// Resolves "what is playing on station X" through the station's source
/// chain, the classifier and the cache.
pub struct MetadataFetcher {
    stations: HashMap<String, StationEntry>,
    order: Vec<String>,
    classifier: Arc<dyn Classifier>,
    artwork: Arc<dyn ArtworkLookup>,
    artwork_backfill: bool,
    cache: MetadataCache,
    clock: Arc<dyn Clock>,
}

impl MetadataFetcher {
    pub fn builder() -> MetadataFetcherBuilder {
        MetadataFetcherBuilder::default()
    }

    /// Build a fetcher with real sources from configuration
    pub fn from_config(config: &AppConfig, http: Arc<dyn HttpClient>) -> Self {
        let settings = &config.metadata;

        let artwork: Arc<dyn ArtworkLookup> = if settings.artwork_backfill {
            Arc::new(ItunesClient::with_timeout(http.clone(), settings.artwork_timeout))
        } else {
            Arc::new(NoArtwork)
        };

        let mut ctx = SourceContext::new(http.clone(), artwork.clone());
        ctx.timeout = settings.source_timeout;
        ctx.triton_base = settings.triton_base.clone();

        let ai = match config.ai.api_key() {
            Some(key) if config.ai.enable => {
                info!("AI classification enabled with model {}", config.ai.model);
                let mut ai_config = AiClassifierConfig::new(&key);
                ai_config.model = config.ai.model.clone();
                ai_config.timeout = config.ai.timeout;
                Some(AiClassifier::new(http.clone(), ai_config))
            }
            Some(_) => {
                info!("AI classification disabled in configuration");
                None
            }
            None => {
                if config.ai.enable {
                    warn!("AI classification enabled but no API key available, using keyword classifier only");
                }
                None
            }
        };

        let mut builder = Self::builder()
            .classifier(Arc::new(build_classifier(ai, config.ai.min_confidence)))
            .artwork(artwork)
            .artwork_backfill(settings.artwork_backfill)
            .cache_ttl(settings.cache_ttl);

        for station in &config.stations {
            let chain = build_chain(station, &ctx);
            builder = builder.station(station.clone(), chain);
        }

        builder.build()
    }

    /// Now-playing information for `station_id`.
    ///
    /// Answers from the cache while the entry is fresh. Otherwise asks the
    /// station's sources in order, classifies the first answer and caches the
    /// result. `None` means the station is unknown or no source answered.
    pub fn get_metadata(&self, station_id: &str) -> Option<NowPlaying> {
        if let Some(cached) = self.cache.get_fresh(station_id) {
            return Some(cached);
        }

        let entry = match self.stations.get(station_id) {
            Some(entry) => entry,
            None => {
                debug!("Unknown station '{}'", station_id);
                return None;
            }
        };

        let _guard = entry.in_flight.lock().unwrap_or_else(|e| e.into_inner());

        // another caller may have refreshed the entry while we waited
        if let Some(cached) = self.cache.get_fresh(station_id) {
            return Some(cached);
        }

        self.refresh(entry)
    }

    fn refresh(&self, entry: &StationEntry) -> Option<NowPlaying> {
        let station = &entry.station;

        let mut track = match self.fetch_track(entry) {
            Some(track) => track,
            None => {
                info!("No metadata available for station '{}'", station.id);
                return None;
            }
        };
        track.station_name = station.name.clone();

        let query = TrackQuery::new(
            &track.title,
            &track.artist,
            track.album.as_deref().unwrap_or(""),
            &station.name,
        );
        let verdict = self.classifier.classify(&query);
        debug!(
            "'{}' on '{}' classified as {} ({:.2}): {}",
            track, station.id, verdict.ad_type, verdict.confidence, verdict.reason
        );

        let mut content = to_display_content(&verdict, &track);
        if self.artwork_backfill
            && !content.is_ad
            && !verdict.is_blocked
            && content.artwork.is_none()
            && !track.artwork_looked_up
        {
            content.artwork = self.artwork.fetch_artwork(&track.title, &track.artist);
        }

        let now_playing = NowPlaying::new(&station.id, &station.name, content, self.clock.utc_now());
        self.cache.insert(&station.id, now_playing.clone());
        Some(now_playing)
    }

    fn fetch_track(&self, entry: &StationEntry) -> Option<TrackMetadata> {
        entry.sources.iter().find_map(|source| {
            debug!("Asking {} for '{}'", source.name(), entry.station.id);
            source.fetch(&entry.station)
        })
    }

    /// Stations in catalogue order
    pub fn stations(&self) -> Vec<&Station> {
        self.order
            .iter()
            .filter_map(|id| self.stations.get(id))
            .map(|entry| &entry.station)
            .collect()
    }

    pub fn station(&self, station_id: &str) -> Option<&Station> {
        self.stations.get(station_id).map(|entry| &entry.station)
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache.ttl()
    }
}

/// Builder for [`MetadataFetcher`]
pub struct MetadataFetcherBuilder {
    stations: Vec<(Station, Vec<Arc<dyn MetadataSource>>)>,
    classifier: Option<Arc<dyn Classifier>>,
    artwork: Arc<dyn ArtworkLookup>,
    artwork_backfill: bool,
    cache_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl Default for MetadataFetcherBuilder {
    fn default() -> Self {
        Self {
            stations: Vec::new(),
            classifier: None,
            artwork: Arc::new(NoArtwork),
            artwork_backfill: true,
            cache_ttl: DEFAULT_TTL,
            clock: Arc::new(SystemClock),
        }
    }
}

impl MetadataFetcherBuilder {
    /// Add a station with its ordered source chain
    pub fn station(mut self, station: Station, sources: Vec<Arc<dyn MetadataSource>>) -> Self {
        self.stations.push((station, sources));
        self
    }

    pub fn classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn artwork(mut self, artwork: Arc<dyn ArtworkLookup>) -> Self {
        self.artwork = artwork;
        self
    }

    pub fn artwork_backfill(mut self, enabled: bool) -> Self {
        self.artwork_backfill = enabled;
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> MetadataFetcher {
        let mut stations = HashMap::new();
        let mut order = Vec::new();

        for (station, sources) in self.stations {
            if stations.contains_key(&station.id) {
                warn!("Duplicate station id '{}', keeping the first definition", station.id);
                continue;
            }
            if sources.is_empty() {
                warn!("Station '{}' has no metadata sources", station.id);
            }
            order.push(station.id.clone());
            stations.insert(station.id.clone(), StationEntry {
                station,
                sources,
                in_flight: Mutex::new(()),
            });
        }

        let classifier = self
            .classifier
            .unwrap_or_else(|| Arc::new(build_classifier(None, crate::classifier::DEFAULT_MIN_CONFIDENCE)));

        MetadataFetcher {
            stations,
            order,
            classifier,
            artwork: self.artwork,
            artwork_backfill: self.artwork_backfill,
            cache: MetadataCache::new(self.cache_ttl, self.clock.clone()),
            clock: self.clock,
        }
    }
}
