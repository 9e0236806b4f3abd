//! secp256k1 primitives shared by the signers and the signature verifier.
//!
//! Signatures are 65 bytes `r ‖ s ‖ v` with `v ∈ {27, 28}`. Only low-`s`
//! signatures are accepted, so each (message, key) pair has exactly one
//! valid encoding.
use alloy::primitives::{keccak256, Address, B256};
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use serde::Serialize;

use crate::constants::SECP256K1_SIGNATURE_LENGTH;

const RECOVERY_ID_OFFSET: u8 = 27;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
pub enum Secp256k1Error {
    #[error("Invalid signature length: expected 65 bytes, got {0}")]
    InvalidLength(usize),
    #[error("Unsupported recovery byte: {0}")]
    InvalidRecoveryByte(u8),
    #[error("Malleable signature: s is in the upper half of the curve order")]
    HighS,
    #[error("Secp256k1 recovery error: {0}")]
    RecoveryError(String),
    #[error("Secp256k1 signing error: {0}")]
    SigningError(String),
}

/// Ethereum address of a public key: the last 20 bytes of
/// `keccak256(uncompressed_point[1..])`.
pub fn public_key_to_address(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let digest = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&digest[12..])
}

/// Recovers the signer address of a 32-byte digest.
pub fn recover_address(hash: &B256, signature: &[u8]) -> Result<Address, Secp256k1Error> {
    if signature.len() != SECP256K1_SIGNATURE_LENGTH {
        return Err(Secp256k1Error::InvalidLength(signature.len()));
    }

    let v = signature[64];
    let recovery_id = v
        .checked_sub(RECOVERY_ID_OFFSET)
        .and_then(RecoveryId::from_byte)
        .filter(|id| !id.is_x_reduced())
        .ok_or(Secp256k1Error::InvalidRecoveryByte(v))?;

    let sig = Signature::from_slice(&signature[..64])
        .map_err(|e| Secp256k1Error::RecoveryError(e.to_string()))?;
    if sig.normalize_s().is_some() {
        return Err(Secp256k1Error::HighS);
    }

    let key = VerifyingKey::recover_from_prehash(hash.as_slice(), &sig, recovery_id)
        .map_err(|e| Secp256k1Error::RecoveryError(e.to_string()))?;
    Ok(public_key_to_address(&key))
}

/// Signs a 32-byte digest, returning `r ‖ s ‖ v` with `v ∈ {27, 28}`.
pub fn sign_hash(
    key: &SigningKey,
    hash: &B256,
) -> Result<[u8; SECP256K1_SIGNATURE_LENGTH], Secp256k1Error> {
    let (sig, recovery_id) = key
        .sign_prehash_recoverable(hash.as_slice())
        .map_err(|e| Secp256k1Error::SigningError(e.to_string()))?;

    let mut out = [0u8; SECP256K1_SIGNATURE_LENGTH];
    out[..64].copy_from_slice(&sig.to_bytes());
    out[64] = recovery_id.to_byte() + RECOVERY_ID_OFFSET;
    Ok(out)
}
