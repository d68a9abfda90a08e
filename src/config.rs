// Configuration handling for onair
//
// Service settings live in the "services" subtree; a service section found at
// the top level is still accepted.

use std::fs;
use std::path::Path;
use std::time::Duration;
use log::{debug, info, warn};
use serde_json::Value;
use thiserror::Error;
use crate::classifier::ai::{DEFAULT_MODEL, DEFAULT_TIMEOUT as AI_TIMEOUT};
use crate::classifier::DEFAULT_MIN_CONFIDENCE;
use crate::data::{default_stations, Station};
use crate::helpers::itunes::ARTWORK_TIMEOUT;
use crate::metadata::DEFAULT_TTL;
use crate::sources::triton::DEFAULT_TRITON_BASE;
use crate::sources::SOURCE_TIMEOUT;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid station list: {0}")]
    Stations(#[source] serde_json::Error),
}

/// Helper function to get service configuration with backward compatibility
///
/// Looks in the "services" section first, then at the top level.
///
/// # Example
/// ```rust
/// use serde_json::json;
/// use onair::config::get_service_config;
///
/// let config = json!({
///   "services": {
///     "webserver": { "port": 8080 }
///   }
/// });
/// assert_eq!(get_service_config(&config, "webserver").unwrap()["port"], 8080);
///
/// let legacy = json!({ "webserver": { "port": 9090 } });
/// assert_eq!(get_service_config(&legacy, "webserver").unwrap()["port"], 9090);
/// ```
pub fn get_service_config<'a>(config: &'a Value, service_name: &str) -> Option<&'a Value> {
    if let Some(service_config) = config.get("services").and_then(|s| s.get(service_name)) {
        debug!("Found {} configuration in services section", service_name);
        return Some(service_config);
    }

    if let Some(service_config) = config.get(service_name) {
        debug!("Found {} configuration at top level (legacy structure)", service_name);
        return Some(service_config);
    }

    debug!("No {} configuration found, using defaults", service_name);
    None
}

fn get_bool(section: Option<&Value>, key: &str, default: bool) -> bool {
    section.and_then(|s| s.get(key)).and_then(Value::as_bool).unwrap_or(default)
}

fn get_secs(section: Option<&Value>, key: &str, default: Duration) -> Duration {
    section
        .and_then(|s| s.get(key))
        .and_then(Value::as_u64)
        .map(Duration::from_secs)
        .unwrap_or(default)
}

fn get_string(section: Option<&Value>, key: &str) -> Option<String> {
    section
        .and_then(|s| s.get(key))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq)]
pub struct WebserverSettings {
    pub enable: bool,
    pub host: String,
    pub port: u16,
}

impl Default for WebserverSettings {
    fn default() -> Self {
        Self {
            enable: true,
            host: "0.0.0.0".to_string(),
            port: 1080,
        }
    }
}

impl WebserverSettings {
    pub fn from_config(config: &Value) -> Self {
        let section = get_service_config(config, "webserver");
        let defaults = Self::default();

        let port = match section.and_then(|s| s.get("port")).and_then(Value::as_u64) {
            Some(port) => u16::try_from(port).unwrap_or_else(|_| {
                warn!("Invalid webserver port {}, using {}", port, defaults.port);
                defaults.port
            }),
            None => defaults.port,
        };

        Self {
            enable: get_bool(section, "enable", defaults.enable),
            host: get_string(section, "host").unwrap_or(defaults.host),
            port,
        }
    }
}

/// Fetching, caching and artwork settings
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataSettings {
    pub cache_ttl: Duration,
    pub source_timeout: Duration,
    pub artwork_timeout: Duration,
    pub artwork_backfill: bool,
    pub triton_base: String,
}

impl Default for MetadataSettings {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_TTL,
            source_timeout: SOURCE_TIMEOUT,
            artwork_timeout: ARTWORK_TIMEOUT,
            artwork_backfill: true,
            triton_base: DEFAULT_TRITON_BASE.to_string(),
        }
    }
}

impl MetadataSettings {
    pub fn from_config(config: &Value) -> Self {
        let section = get_service_config(config, "metadata");
        let defaults = Self::default();
        Self {
            cache_ttl: get_secs(section, "cache_ttl_secs", defaults.cache_ttl),
            source_timeout: get_secs(section, "source_timeout_secs", defaults.source_timeout),
            artwork_timeout: get_secs(section, "artwork_timeout_secs", defaults.artwork_timeout),
            artwork_backfill: get_bool(section, "artwork_backfill", defaults.artwork_backfill),
            triton_base: get_string(section, "triton_base").unwrap_or(defaults.triton_base),
        }
    }
}

/// Settings of the AI classifier (`classifier.ai`)
#[derive(Debug, Clone, PartialEq)]
pub struct AiSettings {
    pub enable: bool,
    /// Key from the config file; see [`AiSettings::api_key`]
    pub configured_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
    pub min_confidence: f32,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            enable: true,
            configured_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout: AI_TIMEOUT,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }
}

impl AiSettings {
    pub fn from_config(config: &Value) -> Self {
        let section = get_service_config(config, "classifier").and_then(|c| c.get("ai"));
        let defaults = Self::default();

        let min_confidence = section
            .and_then(|s| s.get("min_confidence"))
            .and_then(Value::as_f64)
            .map(|c| c as f32)
            .filter(|c| (0.0..=1.0).contains(c))
            .unwrap_or(defaults.min_confidence);

        Self {
            enable: get_bool(section, "enable", defaults.enable),
            configured_key: get_string(section, "api_key"),
            model: get_string(section, "model").unwrap_or(defaults.model),
            timeout: get_secs(section, "timeout_secs", defaults.timeout),
            min_confidence,
        }
    }

    /// Effective API key: config file, then compiled-in or environment key
    pub fn api_key(&self) -> Option<String> {
        self.configured_key.clone().or_else(crate::secrets::gemini_api_key)
    }
}

/// Typed view of the whole configuration file
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub webserver: WebserverSettings,
    pub metadata: MetadataSettings,
    pub ai: AiSettings,
    pub stations: Vec<Station>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            webserver: WebserverSettings::default(),
            metadata: MetadataSettings::default(),
            ai: AiSettings::default(),
            stations: default_stations(),
        }
    }
}

impl AppConfig {
    pub fn from_value(config: &Value) -> Result<Self, ConfigError> {
        let stations = match config.get("stations") {
            Some(list) => {
                let stations: Vec<Station> =
                    serde_json::from_value(list.clone()).map_err(ConfigError::Stations)?;
                if stations.is_empty() {
                    warn!("Configured station list is empty, using built-in stations");
                    default_stations()
                } else {
                    info!("Using {} stations from configuration", stations.len());
                    stations
                }
            }
            None => default_stations(),
        };

        Ok(Self {
            webserver: WebserverSettings::from_config(config),
            metadata: MetadataSettings::from_config(config),
            ai: AiSettings::from_config(config),
            stations,
        })
    }

    /// Load the configuration file.
    ///
    /// A missing file yields the defaults, a file that cannot be read or
    /// parsed is an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match load_config_value(path.as_ref())? {
            Some(value) => Self::from_value(&value),
            None => Ok(Self::default()),
        }
    }
}

/// Read a JSON config file, `None` if it does not exist
pub fn load_config_value(path: &Path) -> Result<Option<Value>, ConfigError> {
    let display = path.display().to_string();
    if !path.exists() {
        warn!("Config file {} not found, using defaults", display);
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: display.clone(),
        source,
    })?;
    let value = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: display.clone(),
        source,
    })?;
    info!("Loaded configuration from {}", display);
    Ok(Some(value))
}
