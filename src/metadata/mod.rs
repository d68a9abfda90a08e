pub mod cache;
pub mod fetcher;

pub use cache::{CacheEntry, MetadataCache, DEFAULT_TTL};
pub use fetcher::{MetadataFetcher, MetadataFetcherBuilder};
