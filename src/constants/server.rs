//! Server defaults.

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_CONFIG_FILE_PATH: &str = "config/config.json";
