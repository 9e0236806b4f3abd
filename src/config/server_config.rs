use std::{env, str::FromStr};

use crate::constants::{
    DEFAULT_BLOCK_TIME_MS, DEFAULT_CONFIG_FILE_PATH, DEFAULT_HOST, DEFAULT_PORT,
    DEFAULT_RECEIPT_POLL_INTERVAL_MS, DEFAULT_SUBMISSION_TIMEOUT_MS,
};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub config_file_path: String,
    /// Hex private key of the relayer's funded identity. A development key
    /// is derived when unset.
    pub relayer_private_key: Option<String>,
    pub submission_timeout_ms: u64,
    pub receipt_poll_interval_ms: u64,
    pub block_time_ms: u64,
}

fn parse_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: parse_or("PORT", DEFAULT_PORT),
            config_file_path: env::var("CONFIG_FILE_PATH")
                .unwrap_or_else(|_| DEFAULT_CONFIG_FILE_PATH.to_string()),
            relayer_private_key: env::var("RELAYER_PRIVATE_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            submission_timeout_ms: parse_or("SUBMISSION_TIMEOUT_MS", DEFAULT_SUBMISSION_TIMEOUT_MS),
            receipt_poll_interval_ms: parse_or(
                "RECEIPT_POLL_INTERVAL_MS",
                DEFAULT_RECEIPT_POLL_INTERVAL_MS,
            ),
            block_time_ms: parse_or("BLOCK_TIME_MS", DEFAULT_BLOCK_TIME_MS),
        }
    }
}
