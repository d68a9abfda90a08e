use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use env_logger::{Builder, Target, WriteStyle};
use log::{debug, info, warn, LevelFilter};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumIter, EnumString};

/// Logging subsystems of onair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LoggingSubsystem {
    /// Main application logging
    Main,
    /// HTTP API
    Api,
    /// Keyword and AI classification
    Classifier,
    /// Provider adapters (Triton, SomaFM, iTunes, generic JSON)
    Sources,
    /// Fetch orchestration and cache
    Metadata,
    /// Outgoing HTTP requests
    Http,
    /// Configuration loading
    Config,
    /// Third-party dependencies
    #[strum(serialize = "deps", serialize = "dependencies")]
    #[serde(rename = "deps", alias = "dependencies")]
    Dependencies,
}

impl LoggingSubsystem {
    /// Module prefixes covered by this subsystem
    pub fn module_prefix(&self) -> &'static str {
        match self {
            LoggingSubsystem::Main => "onair",
            LoggingSubsystem::Api => "onair::api,rocket",
            LoggingSubsystem::Classifier => "onair::classifier",
            LoggingSubsystem::Sources => "onair::sources,onair::helpers::itunes",
            LoggingSubsystem::Metadata => "onair::metadata",
            LoggingSubsystem::Http => "onair::helpers::http_client,ureq",
            LoggingSubsystem::Config => "onair::config",
            LoggingSubsystem::Dependencies => "rocket,ureq,hyper",
        }
    }

    pub fn all() -> Vec<LoggingSubsystem> {
        use strum::IntoEnumIterator;
        LoggingSubsystem::iter().collect()
    }
}

/// Logging configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Global log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Target for log output (stdout, stderr)
    #[serde(default = "default_target")]
    pub target: String,

    #[serde(default = "default_true")]
    pub timestamps: bool,

    #[serde(default = "default_true")]
    pub colors: bool,

    /// Subsystem-specific log levels
    #[serde(default)]
    pub subsystems: HashMap<String, String>,

    #[serde(default)]
    pub include_module_path: bool,

    #[serde(default)]
    pub include_line_numbers: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_target() -> String {
    "stdout".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            target: default_target(),
            timestamps: true,
            colors: true,
            subsystems: HashMap::new(),
            include_module_path: false,
            include_line_numbers: false,
        }
    }
}

impl LoggingConfig {
    /// Load logging configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read logging config file: {}", e))?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Failed to parse logging config: {}", e))
    }

    fn parse_log_level(level: &str) -> LevelFilter {
        match level.to_lowercase().as_str() {
            "off" => LevelFilter::Off,
            "error" => LevelFilter::Error,
            "warn" => LevelFilter::Warn,
            "info" => LevelFilter::Info,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            _ => {
                eprintln!("Warning: Unknown log level '{}', defaulting to 'info'", level);
                LevelFilter::Info
            }
        }
    }

    /// (module, level) pairs for all subsystem overrides; unknown names are
    /// taken as module paths
    fn module_filters(&self) -> Vec<(String, String)> {
        let mut filters = Vec::new();
        let mut names: Vec<_> = self.subsystems.keys().collect();
        names.sort();
        for name in names {
            let level = &self.subsystems[name];
            match name.parse::<LoggingSubsystem>() {
                Ok(subsystem) => {
                    for prefix in subsystem.module_prefix().split(',') {
                        filters.push((prefix.trim().to_string(), level.clone()));
                    }
                }
                Err(_) => filters.push((name.clone(), level.clone())),
            }
        }
        filters
    }

    /// The equivalent env_logger filter string
    pub fn build_filter_string(&self) -> String {
        let mut parts = vec![self.level.clone()];
        parts.extend(
            self.module_filters()
                .into_iter()
                .map(|(module, level)| format!("{}={}", module, level)),
        );
        parts.join(",")
    }

    /// Initialize the logger with this configuration
    pub fn initialize_logger(&self) -> Result<(), String> {
        let filter_string = self.build_filter_string();

        let mut builder = Builder::new();
        builder.filter(None, Self::parse_log_level(&self.level));
        for (module, level) in self.module_filters() {
            builder.filter(Some(&module), Self::parse_log_level(&level));
        }
        // RUST_LOG wins over the file
        builder.parse_env("RUST_LOG");

        builder.write_style(if self.colors { WriteStyle::Auto } else { WriteStyle::Never });

        match self.target.to_lowercase().as_str() {
            "stdout" => {
                builder.target(Target::Stdout);
            }
            "stderr" => {
                builder.target(Target::Stderr);
            }
            other => return Err(format!("Unknown logging target: {}", other)),
        }

        let include_module_path = self.include_module_path;
        let include_line_numbers = self.include_line_numbers;
        let timestamps = self.timestamps;

        builder.format(move |buf, record| {
            let mut output = String::new();
            if timestamps {
                output.push_str(&format!("[{}] ", chrono::Local::now().format("%Y-%m-%d %H:%M:%S")));
            }
            output.push_str(&format!("[{}] ", record.level()));
            if include_module_path {
                if let Some(module) = record.module_path() {
                    output.push_str(&format!("[{}] ", module));
                }
            }
            if include_line_numbers {
                if let (Some(file), Some(line)) = (record.file(), record.line()) {
                    output.push_str(&format!("[{}:{}] ", file, line));
                }
            }
            writeln!(buf, "{}{}", output, record.args())
        });

        builder
            .try_init()
            .map_err(|e| format!("Failed to initialize logger: {}", e))?;

        debug!("Logging initialized with filter: {}", filter_string);
        Ok(())
    }
}

/// Initialize logging from an optional config file and the --debug/--verbose flags
pub fn initialize_logging(config_file: Option<&Path>, debug_mode: bool) -> Result<(), String> {
    let mut missing_file = None;
    let mut config = match config_file {
        Some(path) if path.exists() => LoggingConfig::from_file(path)?,
        Some(path) => {
            missing_file = Some(path.display().to_string());
            LoggingConfig::default()
        }
        None => LoggingConfig::default(),
    };

    if debug_mode {
        config.level = "debug".to_string();
    }

    config.initialize_logger()?;

    if let Some(path) = missing_file {
        warn!("Logging config file {} not found, using defaults", path);
    }
    if debug_mode {
        info!("Debug logging enabled via command line");
    }
    Ok(())
}
