use alloy::{
    primitives::{Bytes, U256},
    sol_types::{Revert, SolError},
};
use thiserror::Error;

use crate::constants::{REVERT_INVALID_NONCE, REVERT_SIGNATURE_INVALID};

/// Whole-submission rejections of the forwarder.
///
/// Both variants revert the entire submission: no nonce is consumed and the
/// target is never invoked.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ForwarderError {
    #[error("{}", REVERT_SIGNATURE_INVALID)]
    SignatureInvalid,

    #[error("{} (expected {expected}, provided {provided})", REVERT_INVALID_NONCE)]
    InvalidNonce { expected: U256, provided: U256 },
}

impl ForwarderError {
    /// Reason string carried in the ledger revert.
    pub fn reason(&self) -> &'static str {
        match self {
            ForwarderError::SignatureInvalid => REVERT_SIGNATURE_INVALID,
            ForwarderError::InvalidNonce { .. } => REVERT_INVALID_NONCE,
        }
    }

    /// ABI-encoded `Error(string)` revert payload.
    pub fn revert_data(&self) -> Bytes {
        Revert::from(self.reason()).abi_encode().into()
    }
}
