use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use clap::Parser;
use log::{error, info};
use onair::api::start_rocket_server;
use onair::config::AppConfig;
use onair::constants::DEFAULT_CONFIG_PATH;
use onair::helpers::http_client::new_http_client;
use onair::logging::initialize_logging;
use onair::MetadataFetcher;

/// Now-playing metadata service for web radio stations
#[derive(Parser)]
#[command(name = "onair", version, about)]
struct Cli {
    /// Configuration file
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Logging configuration file
    #[arg(long, value_name = "FILE")]
    logging_config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose logging (same as --debug)
    #[arg(short, long)]
    verbose: bool,
}

#[rocket::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = initialize_logging(cli.logging_config.as_deref(), cli.debug || cli.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("onair {} starting", env!("CARGO_PKG_VERSION"));

    let config = match AppConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let fetcher = Arc::new(MetadataFetcher::from_config(&config, new_http_client()));
    info!("Serving {} stations", fetcher.stations().len());

    if let Err(e) = start_rocket_server(fetcher, &config.webserver).await {
        error!("Webserver failed: {}", e);
        process::exit(1);
    }
}
