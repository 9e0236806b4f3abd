//! Application state initialization
//!
//! Builds the relayer signer, the network provider, the relayer service and
//! the greeter client, and checks that the locally computed domain separator
//! matches the deployed forwarder.
use std::{sync::Arc, time::Duration};

use actix_web::web;
use alloy::primitives::keccak256;
use color_eyre::Result;
use eyre::WrapErr;
use log::{info, warn};

use super::{initialize_network, DevNetwork};
use crate::{
    config::{Config, ServerConfig},
    domain::{MetaTxRelayer, MetaTxRelayerConfig},
    models::AppState,
    repositories::InMemoryTransactionCounter,
    services::{GreeterClient, LedgerProvider, LocalSigner},
};

const DEV_KEY_SEED: &[u8] = b"metatx-relayer development key";

/// Loads the relayer key, or derives a fixed development key when none is set.
pub fn initialize_signer(server_config: &ServerConfig) -> Result<LocalSigner> {
    let signer = match &server_config.relayer_private_key {
        Some(key) => {
            LocalSigner::from_private_key_hex(key).wrap_err("Invalid RELAYER_PRIVATE_KEY")?
        }
        None => {
            warn!("RELAYER_PRIVATE_KEY not set, using the development key");
            LocalSigner::from_bytes(keccak256(DEV_KEY_SEED).as_slice())?
        }
    };
    info!("relayer address: {}", signer.address_sync());
    Ok(signer)
}

/// Initializes application state
///
/// # Returns
///
/// * `Result<(web::ThinData<AppState>, DevNetwork)>` - Initialized application state and the
///   network it talks to
///
/// # Errors
///
/// Returns error if:
/// - The relayer key is invalid
/// - The network configuration is invalid
/// - The deployed forwarder's domain separator differs from the local one
pub async fn initialize_app_state(
    server_config: &ServerConfig,
    config: &Config,
) -> Result<(web::ThinData<AppState>, DevNetwork)> {
    let signer = Arc::new(initialize_signer(server_config)?);
    let network = initialize_network(config, signer.address_sync())?;

    let provider = Arc::new(
        LedgerProvider::new(network.ledger.clone()).with_auto_mine(config.network.auto_mine),
    );

    let mut relayer_config =
        MetaTxRelayerConfig::new(config.relayer.id.clone(), network.domain.clone());
    relayer_config.submission_timeout = Duration::from_millis(server_config.submission_timeout_ms);
    relayer_config.poll_interval = Duration::from_millis(server_config.receipt_poll_interval_ms);
    relayer_config.gas_overhead = config.relayer.gas_overhead;

    let relayer = Arc::new(MetaTxRelayer::new(
        relayer_config,
        provider.clone(),
        signer,
        Arc::new(InMemoryTransactionCounter::new()),
    ));
    relayer.check_domain().await?;

    let greeter = Arc::new(GreeterClient::new(provider.clone(), network.greeter));

    let app_state = web::ThinData(AppState {
        relayer,
        greeter,
        provider,
    });

    Ok((app_state, network))
}
