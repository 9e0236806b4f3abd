//! Network access for the relayer.
//!
//! The relayer talks to the execution ledger only through
//! [`NetworkProviderTrait`], so the backing network can be swapped or mocked.
use alloy::primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

use crate::models::{LedgerError, SignedTransaction, TransactionReceipt, TransactionStatus};

mod ledger_provider;
pub use ledger_provider::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Transaction rejected: {0}")]
    Rejected(String),
    #[error("Unknown transaction: {0}")]
    UnknownTransaction(B256),
    #[error("Call reverted: {}", reason.as_deref().unwrap_or("<no reason>"))]
    CallReverted {
        reason: Option<String>,
        output: Bytes,
    },
    #[error("Failed to decode response: {0}")]
    Decode(String),
    #[error("Network configuration error: {0}")]
    NetworkConfiguration(String),
    #[error("Other provider error: {0}")]
    Other(String),
}

impl From<LedgerError> for ProviderError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::UnknownTransaction(hash) => ProviderError::UnknownTransaction(hash),
            LedgerError::CallReverted { reason, output } => {
                ProviderError::CallReverted { reason, output }
            }
            LedgerError::UnknownContract(address) => {
                ProviderError::NetworkConfiguration(format!("no contract deployed at {}", address))
            }
            other => ProviderError::Rejected(other.to_string()),
        }
    }
}

impl From<alloy::sol_types::Error> for ProviderError {
    fn from(err: alloy::sol_types::Error) -> Self {
        ProviderError::Decode(err.to_string())
    }
}

#[async_trait]
#[cfg_attr(test, automock)]
#[allow(dead_code)]
pub trait NetworkProviderTrait: Send + Sync {
    async fn get_chain_id(&self) -> Result<u64, ProviderError>;

    async fn get_balance(&self, address: Address) -> Result<U256, ProviderError>;

    async fn get_block_number(&self) -> Result<u64, ProviderError>;

    /// Next envelope nonce for `address`, counting envelopes still pending.
    async fn get_transaction_count(&self, address: Address) -> Result<u64, ProviderError>;

    /// Read-only call against the latest state.
    async fn call(&self, from: Address, to: Address, data: Bytes) -> Result<Bytes, ProviderError>;

    async fn send_transaction(&self, transaction: SignedTransaction) -> Result<B256, ProviderError>;

    /// `Ok(None)` while the transaction is still pending.
    async fn get_transaction_receipt(
        &self,
        hash: B256,
    ) -> Result<Option<TransactionReceipt>, ProviderError>;

    async fn get_transaction_status(&self, hash: B256) -> Result<TransactionStatus, ProviderError>;
}
