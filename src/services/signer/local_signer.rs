//! In-memory secp256k1 signer.
use alloy::primitives::{Address, Bytes, B256};
use async_trait::async_trait;
use k256::ecdsa::SigningKey;

use super::{construct_eip712_message_hash, SignTypedDataRequest, Signer, TypedDataSigner};
use crate::{
    models::{SignedTransaction, SignerError, TransactionEnvelope},
    utils::{decode_hex_field, public_key_to_address, sign_hash},
};

#[derive(Clone)]
pub struct LocalSigner {
    key: SigningKey,
    address: Address,
}

impl std::fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl LocalSigner {
    pub fn from_bytes(raw_key: &[u8]) -> Result<Self, SignerError> {
        let key = SigningKey::from_slice(raw_key)
            .map_err(|e| SignerError::KeyError(format!("Invalid secp256k1 key: {}", e)))?;
        let address = public_key_to_address(key.verifying_key());
        Ok(Self { key, address })
    }

    /// Parses a 32-byte hex private key, with or without `0x`.
    pub fn from_private_key_hex(value: &str) -> Result<Self, SignerError> {
        let raw_key = decode_hex_field(value.trim(), "private key").map_err(SignerError::KeyError)?;
        Self::from_bytes(&raw_key)
    }

    /// Address without going through the async trait.
    pub fn address_sync(&self) -> Address {
        self.address
    }

    fn sign_digest(&self, digest: &B256) -> Result<Bytes, SignerError> {
        let signature =
            sign_hash(&self.key, digest).map_err(|e| SignerError::SigningError(e.to_string()))?;
        Ok(Bytes::copy_from_slice(&signature))
    }
}

#[async_trait]
impl Signer for LocalSigner {
    async fn address(&self) -> Result<Address, SignerError> {
        Ok(self.address)
    }

    async fn sign_transaction(
        &self,
        envelope: TransactionEnvelope,
    ) -> Result<SignedTransaction, SignerError> {
        let signature = self.sign_digest(&envelope.signing_hash())?;
        Ok(SignedTransaction::new(envelope, signature))
    }
}

#[async_trait]
impl TypedDataSigner for LocalSigner {
    async fn sign_typed_data(&self, request: &SignTypedDataRequest) -> Result<Bytes, SignerError> {
        let digest = construct_eip712_message_hash(request)?;
        self.sign_digest(&digest)
    }
}
