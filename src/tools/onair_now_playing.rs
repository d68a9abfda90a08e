use std::path::PathBuf;
use std::process;
use clap::Parser;
use onair::config::AppConfig;
use onair::constants::DEFAULT_CONFIG_PATH;
use onair::helpers::http_client::new_http_client;
use onair::MetadataFetcher;

/// Fetch what a station is playing right now, without the webserver
#[derive(Parser)]
#[command(name = "onair_now_playing", version, about)]
struct Cli {
    /// Station id; lists the stations when omitted
    station: Option<String>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Print JSON instead of a text summary
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let level = if cli.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = AppConfig::load(&cli.config)?;
    let fetcher = MetadataFetcher::from_config(&config, new_http_client());

    let station_id = match cli.station {
        Some(id) => id,
        None => {
            for station in fetcher.stations() {
                let kinds: Vec<_> = station.sources.iter().map(|s| s.kind()).collect();
                println!("{:<16} {:<24} {}", station.id, station.name, kinds.join(" -> "));
            }
            return Ok(());
        }
    };

    let now_playing = match fetcher.get_metadata(&station_id) {
        Some(now_playing) => now_playing,
        None => {
            if fetcher.station(&station_id).is_none() {
                eprintln!("Unknown station '{}'", station_id);
            } else {
                eprintln!("No metadata available for '{}'", station_id);
            }
            process::exit(1);
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&now_playing)?);
    } else {
        println!("{}: {} - {}", now_playing.station_name, now_playing.artist, now_playing.title);
        if !now_playing.album.is_empty() {
            println!("  Album:   {}", now_playing.album);
        }
        if let Some(artwork) = &now_playing.artwork {
            println!("  Artwork: {}", artwork);
        }
        if now_playing.is_ad {
            println!("  (advertisement)");
        }
    }
    Ok(())
}
