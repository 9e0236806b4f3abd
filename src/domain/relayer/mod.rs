//! # Relayer Domain Module
//!
//! Accepts (forward request, signature) pairs from untrusted senders and
//! submits them to the forwarder with the relayer's own funded identity.

use alloy::primitives::{Bytes, Log, B256};

use crate::models::{ExecutionRecord, ExecutionResult, RelayerError};

mod meta_tx_relayer;
pub use meta_tx_relayer::*;

mod sender_lanes;
pub use sender_lanes::*;

/// Settled relay: the forwarder accepted the request and consumed its nonce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayReceipt {
    pub tx_hash: B256,
    pub block_number: u64,
    pub gas_used: u64,
    pub result: ExecutionResult,
    pub record: Option<ExecutionRecord>,
    /// Every log of the submission, target events included.
    pub logs: Vec<Log>,
}

impl RelayReceipt {
    /// Fails with `TargetExecutionFailed` when the target declined.
    pub fn into_result(self) -> Result<Self, RelayerError> {
        if self.result.success {
            return Ok(self);
        }
        Err(RelayerError::TargetExecutionFailed {
            tx_hash: self.tx_hash,
            reason: self.result.revert_reason(),
            return_data: self.result.return_data,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    Settled(RelayReceipt),
    /// Accepted by the network but not observed in time. The request may
    /// still be included; re-query instead of resubmitting.
    PendingUnknown { tx_hash: B256 },
}

impl RelayOutcome {
    pub fn tx_hash(&self) -> B256 {
        match self {
            RelayOutcome::Settled(receipt) => receipt.tx_hash,
            RelayOutcome::PendingUnknown { tx_hash } => *tx_hash,
        }
    }

    /// Settled receipt, or `SubmissionTimeout` if inclusion was not observed.
    pub fn into_settled(self, timeout_ms: u64) -> Result<RelayReceipt, RelayerError> {
        match self {
            RelayOutcome::Settled(receipt) => Ok(receipt),
            RelayOutcome::PendingUnknown { tx_hash } => {
                Err(RelayerError::SubmissionTimeout { tx_hash, timeout_ms })
            }
        }
    }
}
