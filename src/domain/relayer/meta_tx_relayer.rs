//! Relayer service submitting signed forward requests with its own funds.
//!
//! A relay runs in four steps: pre-flight (local signature check and nonce
//! comparison), envelope submission, waiting for inclusion, and decoding the
//! forwarder's result. The relayer never signs a forward request itself; it
//! only signs the envelope that carries it.
use std::{sync::Arc, time::Duration};

use alloy::primitives::{Address, Bytes, B256, U256};
use log::{debug, info, warn};
use tokio::sync::Mutex;

use super::{RelayOutcome, RelayReceipt, SenderLanes};
use crate::{
    constants::{
        DEFAULT_FORWARDING_GAS_OVERHEAD, DEFAULT_RECEIPT_POLL_INTERVAL_MS,
        DEFAULT_SUBMISSION_TIMEOUT_MS, FORWARDER_EXECUTION_GAS, REVERT_INVALID_NONCE,
        REVERT_SIGNATURE_INVALID, TX_INTRINSIC_GAS,
    },
    domain::verify_forward_request,
    models::{
        decode_domain_separator, decode_execute_output, decode_nonce, encode_domain_separator,
        encode_execute, encode_get_nonce, DomainSeparator, ExecutionRecord, ForwardRequest,
        RelayerError, TransactionEnvelope, TransactionReceipt,
    },
    repositories::TransactionCounterTrait,
    services::{NetworkProviderTrait, Signer},
    utils::poll_until_some,
};

#[derive(Debug, Clone)]
pub struct MetaTxRelayerConfig {
    pub relayer_id: String,
    pub forwarder: Address,
    pub domain: DomainSeparator,
    pub submission_timeout: Duration,
    pub poll_interval: Duration,
    /// Gas added on top of `request.gas`, the intrinsic cost and the
    /// forwarder's flat charge when sizing the envelope.
    pub gas_overhead: u64,
}

impl MetaTxRelayerConfig {
    pub fn new(relayer_id: impl Into<String>, domain: DomainSeparator) -> Self {
        Self {
            relayer_id: relayer_id.into(),
            forwarder: domain.verifying_contract,
            domain,
            submission_timeout: Duration::from_millis(DEFAULT_SUBMISSION_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_RECEIPT_POLL_INTERVAL_MS),
            gas_overhead: DEFAULT_FORWARDING_GAS_OVERHEAD,
        }
    }
}

pub struct MetaTxRelayer<P, S, C> {
    config: MetaTxRelayerConfig,
    provider: Arc<P>,
    signer: Arc<S>,
    counter: Arc<C>,
    lanes: SenderLanes,
    submission: Mutex<()>,
}

impl<P, S, C> MetaTxRelayer<P, S, C>
where
    P: NetworkProviderTrait,
    S: Signer,
    C: TransactionCounterTrait,
{
    pub fn new(
        config: MetaTxRelayerConfig,
        provider: Arc<P>,
        signer: Arc<S>,
        counter: Arc<C>,
    ) -> Self {
        Self {
            config,
            provider,
            signer,
            counter,
            lanes: SenderLanes::new(),
            submission: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &MetaTxRelayerConfig {
        &self.config
    }

    pub fn domain(&self) -> &DomainSeparator {
        &self.config.domain
    }

    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    /// Compares the locally computed domain separator with the forwarder's.
    pub async fn check_domain(&self) -> Result<(), RelayerError> {
        let output = self
            .provider
            .call(Address::ZERO, self.config.forwarder, encode_domain_separator())
            .await?;
        let remote = decode_domain_separator(&output)
            .map_err(|e| RelayerError::UnexpectedResponse(e.to_string()))?;
        let local = self.config.domain.separator();
        if local != remote {
            return Err(RelayerError::DomainMismatch { local, remote });
        }
        info!("domain separator {} matches forwarder {}", local, self.config.forwarder);
        Ok(())
    }

    /// Current forwarder nonce of `sender`.
    pub async fn current_nonce(&self, sender: Address) -> Result<U256, RelayerError> {
        let output = self
            .provider
            .call(sender, self.config.forwarder, encode_get_nonce(sender))
            .await?;
        decode_nonce(&output).map_err(|e| RelayerError::UnexpectedResponse(e.to_string()))
    }

    /// Replays the forwarder's checks locally so doomed requests cost nothing.
    pub async fn preflight(
        &self,
        request: &ForwardRequest,
        signature: &[u8],
    ) -> Result<(), RelayerError> {
        verify_forward_request(request, signature, &self.config.domain)?;
        let expected = self.current_nonce(request.from).await?;
        if expected != request.nonce {
            return Err(RelayerError::InvalidNonce {
                expected,
                provided: request.nonce,
            });
        }
        Ok(())
    }

    pub async fn relay(
        &self,
        request: ForwardRequest,
        signature: Bytes,
    ) -> Result<RelayOutcome, RelayerError> {
        self.relay_with_timeout(request, signature, self.config.submission_timeout)
            .await
    }

    /// Relays one request, waiting at most `timeout` for inclusion.
    ///
    /// Returns [`RelayOutcome::PendingUnknown`] when the submission was
    /// accepted but not observed in time; the caller must re-query with
    /// [`Self::transaction_status`] instead of resubmitting.
    pub async fn relay_with_timeout(
        &self,
        request: ForwardRequest,
        signature: Bytes,
        timeout: Duration,
    ) -> Result<RelayOutcome, RelayerError> {
        let sender = request.from;
        let lane = self.lanes.acquire(sender).await;

        let result = async {
            self.preflight(&request, &signature).await?;
            let tx_hash = self.submit(&request, signature).await?;
            info!(
                "relayed request from {} nonce {} as {}",
                sender, request.nonce, tx_hash
            );
            match self.await_receipt(tx_hash, timeout).await {
                Some(receipt) => self.settle(receipt, Some(&request)).await,
                None => {
                    warn!("{} not included within {:?}", tx_hash, timeout);
                    Ok(RelayOutcome::PendingUnknown { tx_hash })
                }
            }
        }
        .await;

        drop(lane);
        self.lanes.prune();
        result
    }

    /// Re-queries an earlier submission.
    pub async fn transaction_status(&self, tx_hash: B256) -> Result<RelayOutcome, RelayerError> {
        match self.provider.get_transaction_receipt(tx_hash).await? {
            Some(receipt) => self.settle(receipt, None).await,
            None => Ok(RelayOutcome::PendingUnknown { tx_hash }),
        }
    }

    /// Signs and submits the envelope carrying `request`. Envelope nonce
    /// allocation and submission are serialized relayer-wide.
    async fn submit(
        &self,
        request: &ForwardRequest,
        signature: Bytes,
    ) -> Result<B256, RelayerError> {
        let mut envelope = TransactionEnvelope {
            chain_id: 0,
            nonce: 0,
            to: self.config.forwarder,
            value: request.value,
            gas_limit: 0,
            data: encode_execute(request.clone(), signature),
        };
        envelope.gas_limit = TX_INTRINSIC_GAS
            .saturating_add(envelope.calldata_gas())
            .saturating_add(FORWARDER_EXECUTION_GAS)
            .saturating_add(request.gas.saturating_to::<u64>())
            .saturating_add(self.config.gas_overhead);

        let _submission = self.submission.lock().await;
        let relayer_address = self.signer.address().await?;
        let counter_key = relayer_address.to_string();
        envelope.chain_id = self.provider.get_chain_id().await?;
        envelope.nonce = self.allocate_nonce(relayer_address, &counter_key).await?;

        let signed = self.signer.sign_transaction(envelope).await?;
        match self.provider.send_transaction(signed).await {
            Ok(tx_hash) => Ok(tx_hash),
            Err(e) => {
                warn!("submission rejected, rolling back envelope nonce: {}", e);
                self.counter
                    .decrement(&self.config.relayer_id, &counter_key)
                    .await?;
                Err(RelayerError::SubmissionRejected(e.to_string()))
            }
        }
    }

    /// Next envelope nonce of the relayer, resynchronised with the network
    /// when the local counter lags behind it.
    async fn allocate_nonce(&self, relayer: Address, key: &str) -> Result<u64, RelayerError> {
        let relayer_id = &self.config.relayer_id;
        let on_chain = self.provider.get_transaction_count(relayer).await?;
        match self.counter.get(relayer_id, key).await? {
            Some(local) if local >= on_chain => {}
            local => {
                debug!(
                    "syncing envelope nonce of {} from {:?} to {}",
                    relayer, local, on_chain
                );
                self.counter.set(relayer_id, key, on_chain).await?;
            }
        }
        Ok(self.counter.get_and_increment(relayer_id, key).await?)
    }

    async fn await_receipt(&self, tx_hash: B256, timeout: Duration) -> Option<TransactionReceipt> {
        let provider = self.provider.clone();
        poll_until_some(
            || {
                let provider = provider.clone();
                async move { provider.get_transaction_receipt(tx_hash).await }
            },
            timeout,
            self.config.poll_interval,
            "relay inclusion",
        )
        .await
    }

    /// Turns an envelope receipt into a relay outcome. A reverted envelope
    /// means the forwarder rejected the whole submission.
    async fn settle(
        &self,
        receipt: TransactionReceipt,
        request: Option<&ForwardRequest>,
    ) -> Result<RelayOutcome, RelayerError> {
        let tx_hash = receipt.tx_hash;
        if !receipt.success {
            let reason = receipt.revert_reason.unwrap_or_default();
            if reason == REVERT_SIGNATURE_INVALID {
                return Err(RelayerError::SignatureInvalid);
            }
            if let (true, Some(request)) = (reason == REVERT_INVALID_NONCE, request) {
                return Err(RelayerError::InvalidNonce {
                    expected: self.current_nonce(request.from).await?,
                    provided: request.nonce,
                });
            }
            return Err(RelayerError::Reverted { tx_hash, reason });
        }

        let result = decode_execute_output(&receipt.output)
            .map_err(|e| RelayerError::UnexpectedResponse(e.to_string()))?;
        let record = receipt
            .logs
            .iter()
            .filter(|log| log.address == self.config.forwarder)
            .find_map(ExecutionRecord::from_log);

        Ok(RelayOutcome::Settled(RelayReceipt {
            tx_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            result,
            record,
            logs: receipt.logs,
        }))
    }
}
