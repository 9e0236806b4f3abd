//! Test context utilities for integration tests
//!
//! [`TestContext`] runs the same bootstrap as the server binary and exposes
//! the pieces tests need to drive and observe it.
//!
//! ```ignore
//! let ctx = TestContext::new().await?;
//! let sender = TestContext::sender(0x11);
//! let (request, signature) = ctx.greet_request(&sender, "gm").await?;
//! ctx.relayer().relay(request, signature).await?;
//! ```

use std::{sync::Arc, time::Duration};

use actix_web::web;
use alloy::primitives::{Address, Bytes, U256};
use eyre::{Result, WrapErr};
use metatx_relayer::{
    bootstrap::{initialize_app_state, DevNetwork},
    config::{Config, ForwarderConfig, NetworkConfig, RelayerConfig, ServerConfig},
    domain::{ForwardRequestBuilder, MetaTxRelayer, MetaTxRelayerConfig},
    models::{AppState, DefaultRelayer, ForwardRequest, IGreeter},
    repositories::InMemoryTransactionCounter,
    services::{GreeterClient, LedgerProvider, LocalSigner, TypedDataSigner},
};

use super::logging::init_test_logging;

pub const RELAYER_KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

/// One development network plus the relayer service bootstrapped on it.
pub struct TestContext {
    pub state: web::ThinData<AppState>,
    pub network: DevNetwork,
}

impl TestContext {
    /// Context whose ledger mines a block after every submission.
    pub async fn new() -> Result<Self> {
        Self::with_auto_mine(true).await
    }

    /// Context whose ledger only mines when a test asks it to.
    pub async fn manual_mining() -> Result<Self> {
        Self::with_auto_mine(false).await
    }

    async fn with_auto_mine(auto_mine: bool) -> Result<Self> {
        init_test_logging();

        let server_config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            config_file_path: String::new(),
            relayer_private_key: Some(RELAYER_KEY.to_string()),
            submission_timeout_ms: 2_000,
            receipt_poll_interval_ms: 5,
            block_time_ms: 10,
        };
        let config = Config {
            network: NetworkConfig {
                auto_mine,
                ..NetworkConfig::default()
            },
            forwarder: ForwarderConfig::default(),
            relayer: RelayerConfig {
                id: "test-relayer".to_string(),
                name: "Test Relayer".to_string(),
                funding_wei: "1000000000000000000000".to_string(),
                gas_overhead: 10_000,
            },
        };

        let (state, network) = initialize_app_state(&server_config, &config)
            .await
            .wrap_err("Failed to bootstrap test network")?;
        Ok(Self { state, network })
    }

    pub fn relayer(&self) -> &Arc<DefaultRelayer> {
        &self.state.0.relayer
    }

    pub fn provider(&self) -> &Arc<LedgerProvider> {
        &self.state.0.provider
    }

    pub fn greeter(&self) -> &GreeterClient<LedgerProvider> {
        &self.state.0.greeter
    }

    pub fn relayer_address() -> Address {
        LocalSigner::from_private_key_hex(RELAYER_KEY)
            .expect("valid relayer key")
            .address_sync()
    }

    /// Sender identity derived from a one-byte seed.
    pub fn sender(seed: u8) -> LocalSigner {
        LocalSigner::from_bytes(&[seed; 32]).expect("valid sender key")
    }

    pub async fn sign(&self, sender: &LocalSigner, request: &ForwardRequest) -> Result<Bytes> {
        Ok(sender
            .sign_forward_request(request, &self.network.domain)
            .await?)
    }

    /// `setGreeting(greeting)` from `sender` at its current nonce, signed.
    pub async fn greet_request(
        &self,
        sender: &LocalSigner,
        greeting: &str,
    ) -> Result<(ForwardRequest, Bytes)> {
        let request = ForwardRequestBuilder::new(sender.address_sync(), self.network.greeter)
            .call(IGreeter::setGreetingCall {
                greeting: greeting.to_string(),
            })
            .build_with_nonce(self.provider().as_ref(), self.network.forwarder)
            .await?;
        let signature = self.sign(sender, &request).await?;
        Ok((request, signature))
    }

    /// Same as [`Self::greet_request`] with an explicit nonce.
    pub async fn greet_request_at(
        &self,
        sender: &LocalSigner,
        greeting: &str,
        nonce: u64,
    ) -> Result<(ForwardRequest, Bytes)> {
        let request = ForwardRequestBuilder::new(sender.address_sync(), self.network.greeter)
            .call(IGreeter::setGreetingCall {
                greeting: greeting.to_string(),
            })
            .build(U256::from(nonce));
        let signature = self.sign(sender, &request).await?;
        Ok((request, signature))
    }

    pub async fn nonce(&self, address: Address) -> Result<U256> {
        Ok(self.relayer().current_nonce(address).await?)
    }

    pub fn fund(&self, address: Address, amount: U256) {
        self.network.ledger.lock().fund(address, amount);
    }

    pub fn balance(&self, address: Address) -> U256 {
        self.network.ledger.lock().balance(address)
    }

    pub fn pending_count(&self) -> usize {
        self.network.ledger.lock().pending_count()
    }

    pub fn mine(&self) {
        self.network.ledger.lock().mine_block();
    }

    /// Waits until `count` envelopes sit in the mempool.
    pub async fn wait_for_pending(&self, count: usize) {
        for _ in 0..400 {
            if self.pending_count() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("mempool never reached {} envelopes", count);
    }

    /// Second relayer on the same network, with its own funded key and
    /// envelope counter.
    pub fn extra_relayer(&self, seed: u8) -> DefaultRelayer {
        let signer = Self::sender(seed);
        self.fund(signer.address_sync(), U256::from(10u64).pow(U256::from(21)));

        let mut config = MetaTxRelayerConfig::new(
            format!("extra-relayer-{}", seed),
            self.network.domain.clone(),
        );
        config.poll_interval = Duration::from_millis(5);
        MetaTxRelayer::new(
            config,
            self.provider().clone(),
            Arc::new(signer),
            Arc::new(InMemoryTransactionCounter::new()),
        )
    }
}
