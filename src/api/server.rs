use std::sync::Arc;
use log::info;
use rocket::config::Config;
use rocket::serde::json::Json;
use rocket::{get, routes, Build, Rocket};
use crate::api::{cache, nowplaying, stations};
use crate::config::WebserverSettings;
use crate::constants::API_PREFIX;
use crate::metadata::MetadataFetcher;

#[derive(serde::Serialize)]
struct VersionResponse {
    version: String,
}

#[get("/version")]
fn get_version() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Assemble the Rocket instance without launching it
pub fn build_rocket(fetcher: Arc<MetadataFetcher>, settings: &WebserverSettings) -> Rocket<Build> {
    let config = Config::figment()
        .merge(("port", settings.port))
        .merge(("address", settings.host.clone()));

    let api_routes = routes![
        get_version,
        nowplaying::get_now_playing,
        stations::list_stations,
    ];

    let cache_routes = routes![cache::get_cache_statistics];

    rocket::custom(config)
        .mount(API_PREFIX, api_routes)
        .mount(format!("{}/cache", API_PREFIX), cache_routes)
        .manage(fetcher)
}

/// Start the Rocket server, returns immediately when the webserver is disabled
pub async fn start_rocket_server(fetcher: Arc<MetadataFetcher>, settings: &WebserverSettings) -> Result<(), rocket::Error> {
    if !settings.enable {
        info!("Webserver is disabled in configuration");
        return Ok(());
    }

    info!("Starting webserver on {}:{}", settings.host, settings.port);
    let _rocket = build_rocket(fetcher, settings).launch().await?;
    Ok(())
}
