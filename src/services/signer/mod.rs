//! # Signers
//!
//! Two signing concerns live here:
//!
//! - [`Signer`]: signs the relayer's own transaction envelopes.
//! - [`TypedDataSigner`]: produces EIP-712 signatures over forward requests,
//!   the way a user wallet would.
//!
//! ```text
//! Signer / TypedDataSigner (traits)
//!   └── LocalSigner   - in-memory secp256k1 key (development/testing)
//! ```
use alloy::primitives::{keccak256, Address, Bytes, B256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[cfg(test)]
use mockall::automock;

use crate::{
    models::{DomainSeparator, ForwardRequest, SignedTransaction, SignerError, TransactionEnvelope},
    utils::decode_hex_field,
};

mod local_signer;
pub use local_signer::*;

const EIP712_PREFIX: [u8; 2] = [0x19, 0x01];
const EIP712_MESSAGE_SIZE: usize = 66;
const HASH_LENGTH: usize = 32;

#[async_trait]
#[cfg_attr(test, automock)]
pub trait Signer: Send + Sync {
    /// Address the signer's key controls.
    async fn address(&self) -> Result<Address, SignerError>;

    async fn sign_transaction(
        &self,
        envelope: TransactionEnvelope,
    ) -> Result<SignedTransaction, SignerError>;
}

/// Pre-hashed EIP-712 input: a domain separator and a struct hash, both hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignTypedDataRequest {
    pub domain_separator: String,
    pub hash_struct_message: String,
}

#[async_trait]
pub trait TypedDataSigner: Send + Sync {
    async fn sign_typed_data(&self, request: &SignTypedDataRequest) -> Result<Bytes, SignerError>;

    /// Signs `request` for the forwarder identified by `domain`.
    async fn sign_forward_request(
        &self,
        request: &ForwardRequest,
        domain: &DomainSeparator,
    ) -> Result<Bytes, SignerError> {
        let typed = SignTypedDataRequest {
            domain_separator: domain.separator().to_string(),
            hash_struct_message: crate::models::struct_hash(request).to_string(),
        };
        self.sign_typed_data(&typed).await
    }
}

/// Builds `keccak256("\x19\x01" ‖ domainSeparator ‖ hashStruct(message))`.
///
/// # Errors
///
/// Returns `SignerError::InvalidInput` if either component is not valid hex
/// or is not exactly 32 bytes long.
pub fn construct_eip712_message_hash(request: &SignTypedDataRequest) -> Result<B256, SignerError> {
    let domain_separator = decode_hex_field(&request.domain_separator, "domain separator")
        .map_err(SignerError::InvalidInput)?;
    let hash_struct = decode_hex_field(&request.hash_struct_message, "hash struct message")
        .map_err(SignerError::InvalidInput)?;

    if domain_separator.len() != HASH_LENGTH {
        return Err(SignerError::InvalidInput(format!(
            "Invalid domain separator length: expected {} bytes, got {}",
            HASH_LENGTH,
            domain_separator.len()
        )));
    }
    if hash_struct.len() != HASH_LENGTH {
        return Err(SignerError::InvalidInput(format!(
            "Invalid hash struct length: expected {} bytes, got {}",
            HASH_LENGTH,
            hash_struct.len()
        )));
    }

    let mut eip712_message = [0u8; EIP712_MESSAGE_SIZE];
    eip712_message[0..2].copy_from_slice(&EIP712_PREFIX);
    eip712_message[2..34].copy_from_slice(&domain_separator);
    eip712_message[34..66].copy_from_slice(&hash_struct);

    Ok(keccak256(eip712_message))
}
