/// Mount point of all HTTP routes
pub const API_PREFIX: &str = "/api";

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "/etc/onair.json";
