use alloy::primitives::{Bytes, B256, U256};
use thiserror::Error;

use super::{ApiError, ForwarderError, RepositoryError, SignerError};
use crate::services::ProviderError;

#[derive(Error, Debug)]
pub enum RelayerError {
    #[error("Signature verification failed")]
    SignatureInvalid,

    #[error("Invalid nonce: expected {expected}, provided {provided}")]
    InvalidNonce { expected: U256, provided: U256 },

    #[error("Target execution failed in {tx_hash}: {}", reason.as_deref().unwrap_or("<no reason>"))]
    TargetExecutionFailed {
        tx_hash: B256,
        return_data: Bytes,
        reason: Option<String>,
    },

    #[error("Submission {tx_hash} not included within {timeout_ms} ms")]
    SubmissionTimeout { tx_hash: B256, timeout_ms: u64 },

    #[error("Domain separator mismatch: local {local}, ledger {remote}")]
    DomainMismatch { local: B256, remote: B256 },

    #[error("Submission rejected: {0}")]
    SubmissionRejected(String),

    #[error("Submission {tx_hash} reverted: {reason}")]
    Reverted { tx_hash: B256, reason: String },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Signer error: {0}")]
    Signer(#[from] SignerError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl RelayerError {
    /// Whether the rejection left the sender's nonce untouched, so the same
    /// request can be resubmitted once its cause is fixed.
    pub fn is_inert(&self) -> bool {
        !matches!(
            self,
            RelayerError::TargetExecutionFailed { .. } | RelayerError::SubmissionTimeout { .. }
        )
    }
}

impl From<ForwarderError> for RelayerError {
    fn from(error: ForwarderError) -> Self {
        match error {
            ForwarderError::SignatureInvalid => RelayerError::SignatureInvalid,
            ForwarderError::InvalidNonce { expected, provided } => {
                RelayerError::InvalidNonce { expected, provided }
            }
        }
    }
}

impl From<RelayerError> for ApiError {
    fn from(error: RelayerError) -> Self {
        let message = error.to_string();
        match error {
            RelayerError::SignatureInvalid | RelayerError::TargetExecutionFailed { .. } => {
                ApiError::BadRequest(message)
            }
            RelayerError::InvalidNonce { .. } => ApiError::Conflict(message),
            RelayerError::Provider(ProviderError::UnknownTransaction(_)) => {
                ApiError::NotFound(message)
            }
            RelayerError::SubmissionTimeout { .. }
            | RelayerError::SubmissionRejected(_)
            | RelayerError::Reverted { .. }
            | RelayerError::Provider(_) => ApiError::BadGateway(message),
            RelayerError::DomainMismatch { .. }
            | RelayerError::UnexpectedResponse(_)
            | RelayerError::Signer(_)
            | RelayerError::Repository(_) => ApiError::InternalError(message),
        }
    }
}
