use std::sync::Arc;
use rocket::serde::json::Json;
use rocket::{get, State};
use serde::Serialize;
use crate::metadata::MetadataFetcher;

#[derive(Debug, Serialize)]
pub struct StationSummary {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct StationsResponse {
    pub stations: Vec<StationSummary>,
}

/// All configured stations in catalogue order
#[get("/stations")]
pub fn list_stations(fetcher: &State<Arc<MetadataFetcher>>) -> Json<StationsResponse> {
    let stations = fetcher
        .stations()
        .into_iter()
        .map(|station| StationSummary {
            id: station.id.clone(),
            name: station.name.clone(),
        })
        .collect();
    Json(StationsResponse { stations })
}
