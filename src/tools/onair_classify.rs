use std::path::PathBuf;
use clap::Parser;
use log::warn;
use onair::classifier::{build_classifier, to_display_content, AiClassifier, AiClassifierConfig, Classifier, TrackQuery};
use onair::config::AppConfig;
use onair::constants::DEFAULT_CONFIG_PATH;
use onair::data::TrackMetadata;
use onair::helpers::http_client::new_http_client;

/// Classify a single piece of now-playing metadata
#[derive(Parser)]
#[command(name = "onair_classify", version, about)]
struct Cli {
    /// Track title
    title: String,

    /// Artist
    #[arg(default_value = "")]
    artist: String,

    /// Album
    #[arg(default_value = "")]
    album: String,

    /// Context passed to the classifier, usually the station name
    #[arg(long, default_value = "")]
    context: String,

    /// Configuration file (for AI settings)
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Use the keyword classifier only
    #[arg(long)]
    no_ai: bool,

    /// Show the display mapping as well
    #[arg(long)]
    display: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = AppConfig::load(&cli.config)?;

    let ai = if cli.no_ai || !config.ai.enable {
        None
    } else {
        match config.ai.api_key() {
            Some(key) => {
                let mut ai_config = AiClassifierConfig::new(&key);
                ai_config.model = config.ai.model.clone();
                ai_config.timeout = config.ai.timeout;
                Some(AiClassifier::new(new_http_client(), ai_config))
            }
            None => {
                warn!("No API key available, using keyword classifier only");
                None
            }
        }
    };

    let classifier = build_classifier(ai, config.ai.min_confidence);
    let query = TrackQuery::new(&cli.title, &cli.artist, &cli.album, &cli.context);
    let verdict = classifier.classify(&query);
    println!("{}", serde_json::to_string_pretty(&verdict)?);

    if cli.display {
        let album = Some(cli.album.as_str()).filter(|a| !a.is_empty());
        let track = TrackMetadata::from_upstream(
            Some(cli.title.as_str()),
            Some(cli.artist.as_str()),
            album,
            None,
            &cli.context,
            "cli",
        );
        let content = to_display_content(&verdict, &track);
        println!("{}", serde_json::to_string_pretty(&content)?);
    }

    Ok(())
}
