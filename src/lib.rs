/// Track, verdict, display and station data types
pub mod data;

/// Provider adapters that report what a station is playing
pub mod sources;

/// Keyword and AI advertisement classification
pub mod classifier;

/// Fetch orchestration and the now-playing cache
pub mod metadata;

/// HTTP API
pub mod api;

/// Helper utilities (HTTP client, clock, iTunes)
pub mod helpers;

pub mod config;
pub mod constants;
pub mod logging;
pub mod secrets;

pub use data::{NowPlaying, Station, TrackMetadata};
pub use metadata::MetadataFetcher;
