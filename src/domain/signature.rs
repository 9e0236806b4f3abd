//! Signature verification for forward requests.
use alloy::primitives::{Address, B256};
use log::debug;

use crate::{
    models::{signing_hash, DomainSeparator, ForwardRequest, ForwarderError},
    utils::recover_address,
};

/// Recovers the signer of `hash`, or `None` when the signature is malformed,
/// malleable or unrecoverable.
pub fn recover_signer(hash: &B256, signature: &[u8]) -> Option<Address> {
    match recover_address(hash, signature) {
        Ok(address) => Some(address),
        Err(e) => {
            debug!("signature recovery failed: {}", e);
            None
        }
    }
}

/// Verifies that `signature` was produced by `request.from` over the
/// request's signing hash under `domain`.
///
/// Every failure mode (wrong length, unsupported `v`, high `s`, failed
/// recovery, signer mismatch) collapses into
/// [`ForwarderError::SignatureInvalid`].
pub fn verify_forward_request(
    request: &ForwardRequest,
    signature: &[u8],
    domain: &DomainSeparator,
) -> Result<Address, ForwarderError> {
    let hash = signing_hash(request, domain);
    match recover_signer(&hash, signature) {
        Some(signer) if signer == request.from => Ok(signer),
        Some(signer) => {
            debug!(
                "signature recovered {} but request is from {}",
                signer, request.from
            );
            Err(ForwarderError::SignatureInvalid)
        }
        None => Err(ForwarderError::SignatureInvalid),
    }
}
