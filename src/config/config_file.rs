//! JSON configuration file: the development network, the forwarder deployed
//! on it and the relayer identity that pays for submissions.
use std::{fs, str::FromStr};

use alloy::primitives::U256;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_CHAIN_ID, DEFAULT_FORWARDER_NAME, DEFAULT_FORWARDER_VERSION,
    DEFAULT_FORWARDING_GAS_OVERHEAD, DEFAULT_GAS_PRICE, DEFAULT_RELAYER_FUNDING_WEI,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid ID length: {0}")]
    InvalidIdLength(String),
    #[error("Invalid ID format: {0}")]
    InvalidIdFormat(String),
    #[error("Missing required field: {0}")]
    MissingField(String),
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub forwarder: ForwarderConfig,
    pub relayer: RelayerConfig,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.network.validate()?;
        self.forwarder.validate()?;
        self.relayer.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkConfig {
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    /// Gas price in wei.
    #[serde(default = "default_gas_price")]
    pub gas_price: u64,
    /// Mine a block after every submission instead of on a timer.
    #[serde(default)]
    pub auto_mine: bool,
}

fn default_chain_id() -> u64 {
    DEFAULT_CHAIN_ID
}

fn default_gas_price() -> u64 {
    DEFAULT_GAS_PRICE as u64
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            chain_id: default_chain_id(),
            gas_price: default_gas_price(),
            auto_mine: false,
        }
    }
}

impl NetworkConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.chain_id == 0 {
            return Err(ConfigError::InvalidValue {
                field: "network.chain_id".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForwarderConfig {
    #[serde(default = "default_forwarder_name")]
    pub name: String,
    #[serde(default = "default_forwarder_version")]
    pub version: String,
}

fn default_forwarder_name() -> String {
    DEFAULT_FORWARDER_NAME.to_string()
}

fn default_forwarder_version() -> String {
    DEFAULT_FORWARDER_VERSION.to_string()
}

impl Default for ForwarderConfig {
    fn default() -> Self {
        Self {
            name: default_forwarder_name(),
            version: default_forwarder_version(),
        }
    }
}

impl ForwarderConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::MissingField("forwarder name".into()));
        }
        if self.version.is_empty() {
            return Err(ConfigError::MissingField("forwarder version".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelayerConfig {
    pub id: String,
    pub name: String,
    /// Balance credited to the relayer at genesis, in wei (decimal or `0x`-hex).
    #[serde(default = "default_funding_wei")]
    pub funding_wei: String,
    #[serde(default = "default_gas_overhead")]
    pub gas_overhead: u64,
}

fn default_funding_wei() -> String {
    DEFAULT_RELAYER_FUNDING_WEI.to_string()
}

fn default_gas_overhead() -> u64 {
    DEFAULT_FORWARDING_GAS_OVERHEAD
}

impl RelayerConfig {
    const MAX_ID_LENGTH: usize = 36;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.id.is_empty() {
            return Err(ConfigError::MissingField("relayer id".into()));
        }
        let id_pattern = Regex::new(r"^[a-zA-Z0-9-_]+$")
            .map_err(|e| ConfigError::InvalidIdFormat(e.to_string()))?;
        if !id_pattern.is_match(&self.id) {
            return Err(ConfigError::InvalidIdFormat(
                "ID must contain only letters, numbers, dashes and underscores".into(),
            ));
        }
        if self.id.len() > Self::MAX_ID_LENGTH {
            return Err(ConfigError::InvalidIdLength(format!(
                "ID length must not exceed {} characters",
                Self::MAX_ID_LENGTH
            )));
        }
        if self.name.is_empty() {
            return Err(ConfigError::MissingField("relayer name".into()));
        }
        self.funding()?;
        Ok(())
    }

    pub fn funding(&self) -> Result<U256, ConfigError> {
        U256::from_str(&self.funding_wei).map_err(|e| ConfigError::InvalidValue {
            field: "relayer.funding_wei".into(),
            reason: e.to_string(),
        })
    }
}

pub fn load_config(path: &str) -> Result<Config, ConfigError> {
    let config_str = fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&config_str)?;
    config.validate()?;
    Ok(config)
}
