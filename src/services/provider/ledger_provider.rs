//! Provider backed by the in-process execution ledger.
use std::time::Duration;

use alloy::primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use log::{debug, info};
use tokio::task::JoinHandle;

use super::{NetworkProviderTrait, ProviderError};
use crate::{
    ledger::SharedLedger,
    models::{SignedTransaction, TransactionReceipt, TransactionStatus},
};

#[derive(Clone)]
pub struct LedgerProvider {
    ledger: SharedLedger,
    auto_mine: bool,
}

impl LedgerProvider {
    pub fn new(ledger: SharedLedger) -> Self {
        Self {
            ledger,
            auto_mine: false,
        }
    }

    /// Mines a block right after every accepted submission.
    pub fn with_auto_mine(mut self, auto_mine: bool) -> Self {
        self.auto_mine = auto_mine;
        self
    }

    pub fn ledger(&self) -> &SharedLedger {
        &self.ledger
    }

    /// Spawns a task that mines pending envelopes every `interval`.
    pub fn spawn_block_producer(&self, interval: Duration) -> JoinHandle<()> {
        let ledger = self.ledger.clone();
        info!("starting block producer with interval {:?}", interval);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let mut ledger = ledger.lock();
                if ledger.pending_count() > 0 {
                    ledger.mine_block();
                }
            }
        })
    }
}

#[async_trait]
impl NetworkProviderTrait for LedgerProvider {
    async fn get_chain_id(&self) -> Result<u64, ProviderError> {
        Ok(self.ledger.lock().chain_id())
    }

    async fn get_balance(&self, address: Address) -> Result<U256, ProviderError> {
        Ok(self.ledger.lock().balance(address))
    }

    async fn get_block_number(&self) -> Result<u64, ProviderError> {
        Ok(self.ledger.lock().block_number())
    }

    async fn get_transaction_count(&self, address: Address) -> Result<u64, ProviderError> {
        Ok(self.ledger.lock().pending_nonce(address))
    }

    async fn call(&self, from: Address, to: Address, data: Bytes) -> Result<Bytes, ProviderError> {
        Ok(self.ledger.lock().call(from, to, &data)?)
    }

    async fn send_transaction(
        &self,
        transaction: SignedTransaction,
    ) -> Result<B256, ProviderError> {
        let mut ledger = self.ledger.lock();
        let hash = ledger.submit(transaction)?;
        debug!("accepted transaction {}", hash);
        if self.auto_mine {
            ledger.mine_block();
        }
        Ok(hash)
    }

    async fn get_transaction_receipt(
        &self,
        hash: B256,
    ) -> Result<Option<TransactionReceipt>, ProviderError> {
        let ledger = self.ledger.lock();
        match ledger.transaction_status(&hash)? {
            TransactionStatus::Pending => Ok(None),
            TransactionStatus::Confirmed | TransactionStatus::Reverted => {
                Ok(ledger.receipt(&hash).cloned())
            }
        }
    }

    async fn get_transaction_status(&self, hash: B256) -> Result<TransactionStatus, ProviderError> {
        Ok(self.ledger.lock().transaction_status(&hash)?)
    }
}
