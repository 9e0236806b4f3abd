use alloy::primitives::{Address, Bytes, B256, U256};
use thiserror::Error;

/// Admission and lookup failures of the execution ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid envelope signature")]
    InvalidSignature,

    #[error("Chain id mismatch: expected {expected}, got {got}")]
    ChainIdMismatch { expected: u64, got: u64 },

    #[error("Nonce too low for {sender}: expected {expected}, got {got}")]
    NonceTooLow {
        sender: Address,
        expected: u64,
        got: u64,
    },

    #[error("Nonce too high for {sender}: expected {expected}, got {got}")]
    NonceTooHigh {
        sender: Address,
        expected: u64,
        got: u64,
    },

    #[error("Intrinsic gas too low: required {required}, limit {limit}")]
    IntrinsicGasTooLow { required: u64, limit: u64 },

    #[error("Insufficient funds for {sender}: balance {balance}, cost {cost}")]
    InsufficientFunds {
        sender: Address,
        balance: U256,
        cost: U256,
    },

    #[error("Transaction already known: {0}")]
    AlreadyKnown(B256),

    #[error("Unknown transaction: {0}")]
    UnknownTransaction(B256),

    #[error("No contract deployed at {0}")]
    UnknownContract(Address),

    #[error("Execution reverted: {}", reason.as_deref().unwrap_or("<no reason>"))]
    CallReverted {
        reason: Option<String>,
        output: Bytes,
    },
}
