use std::sync::Arc;
use rocket::serde::json::Json;
use rocket::{get, State};
use serde::Serialize;
use crate::metadata::MetadataFetcher;

/// Response structure for cache statistics
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatsResponse {
    pub entries: usize,
    pub ttl_seconds: u64,
}

#[get("/stats")]
pub fn get_cache_statistics(fetcher: &State<Arc<MetadataFetcher>>) -> Json<CacheStatsResponse> {
    Json(CacheStatsResponse {
        entries: fetcher.cache_size(),
        ttl_seconds: fetcher.cache_ttl().as_secs(),
    })
}
