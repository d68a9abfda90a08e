// Data structures for onair

pub mod display;
pub mod station;
pub mod track;
pub mod verdict;

pub use display::{DisplayContent, NowPlaying};
pub use station::{default_stations, SourceConfig, Station};
pub use track::TrackMetadata;
pub use verdict::{AdType, ClassificationVerdict};
