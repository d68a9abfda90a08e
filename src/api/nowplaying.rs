use std::sync::Arc;
use log::{debug, error};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{get, State};
use crate::data::NowPlaying;
use crate::metadata::MetadataFetcher;

/// Current track of a station, classified and ready for display.
///
/// 404 when the station is unknown or none of its sources answered,
/// 400 when the station parameter is missing.
#[get("/now-playing?<station>")]
pub async fn get_now_playing(
    station: Option<&str>,
    fetcher: &State<Arc<MetadataFetcher>>,
) -> Result<Json<NowPlaying>, Status> {
    let station_id = match station.map(str::trim).filter(|s| !s.is_empty()) {
        Some(id) => id.to_string(),
        None => return Err(Status::BadRequest),
    };
    debug!("API request: now playing on '{}'", station_id);

    // fetching blocks on upstream HTTP
    let fetcher = fetcher.inner().clone();
    let lookup_id = station_id.clone();
    let result = tokio::task::spawn_blocking(move || fetcher.get_metadata(&lookup_id)).await;

    match result {
        Ok(Some(now_playing)) => Ok(Json(now_playing)),
        Ok(None) => Err(Status::NotFound),
        Err(e) => {
            error!("Metadata lookup for '{}' failed: {}", station_id, e);
            Err(Status::InternalServerError)
        }
    }
}
