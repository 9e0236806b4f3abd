//! Submission envelopes, receipts and blocks of the execution ledger.
use alloy::{
    primitives::{keccak256, Address, Bytes, Log, B256, U256},
    sol_types::SolValue,
};
use serde::Serialize;
use strum::Display;

/// Unsigned submission envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionEnvelope {
    pub chain_id: u64,
    pub nonce: u64,
    pub to: Address,
    pub value: U256,
    pub gas_limit: u64,
    pub data: Bytes,
}

impl TransactionEnvelope {
    /// `keccak256(abi.encode(chainId, nonce, to, value, gasLimit, data))`
    pub fn signing_hash(&self) -> B256 {
        let encoded = (
            U256::from(self.chain_id),
            U256::from(self.nonce),
            self.to,
            self.value,
            U256::from(self.gas_limit),
            self.data.clone(),
        )
            .abi_encode_params();
        keccak256(encoded)
    }

    /// Calldata gas: 4 per zero byte, 16 per non-zero byte.
    pub fn calldata_gas(&self) -> u64 {
        use crate::constants::{CALLDATA_NONZERO_BYTE_GAS, CALLDATA_ZERO_BYTE_GAS};
        self.data
            .iter()
            .map(|byte| {
                if *byte == 0 {
                    CALLDATA_ZERO_BYTE_GAS
                } else {
                    CALLDATA_NONZERO_BYTE_GAS
                }
            })
            .sum()
    }
}

/// Envelope plus the submitter's 65-byte `r ‖ s ‖ v` signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub envelope: TransactionEnvelope,
    pub signature: Bytes,
}

impl SignedTransaction {
    pub fn new(envelope: TransactionEnvelope, signature: Bytes) -> Self {
        Self {
            envelope,
            signature,
        }
    }

    /// Identifier of the submission on the ledger.
    pub fn hash(&self) -> B256 {
        let mut preimage = Vec::with_capacity(32 + self.signature.len());
        preimage.extend_from_slice(self.envelope.signing_hash().as_slice());
        preimage.extend_from_slice(&self.signature);
        keccak256(preimage)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub tx_hash: B256,
    pub block_number: u64,
    pub from: Address,
    pub to: Address,
    pub success: bool,
    pub gas_used: u64,
    pub effective_gas_price: u128,
    pub output: Bytes,
    pub revert_reason: Option<String>,
    pub logs: Vec<Log>,
}

impl TransactionReceipt {
    /// Fee debited from the submitter.
    pub fn fee(&self) -> U256 {
        U256::from(self.gas_used) * U256::from(self.effective_gas_price)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub number: u64,
    pub timestamp: i64,
    pub transactions: Vec<B256>,
}

/// Lifecycle of a submission as seen by the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Confirmed,
    Reverted,
}
