//! Forwarder (dispatcher) constants.
//!
//! The domain name and version are part of every EIP-712 signature, so any
//! off-line signer must use exactly these values unless the deployment
//! overrides them in its configuration file.

/// Default EIP-712 domain name of the forwarder.
pub const DEFAULT_FORWARDER_NAME: &str = "MetaTxRelayer";
/// Default EIP-712 domain version of the forwarder.
pub const DEFAULT_FORWARDER_VERSION: &str = "1";

/// Revert reason used when a forward request signature does not verify.
pub const REVERT_SIGNATURE_INVALID: &str = "MetaTxRelayer: signature verification failed";
/// Revert reason used when a forward request nonce is stale or skipped.
pub const REVERT_INVALID_NONCE: &str = "MetaTxRelayer: invalid nonce";
/// Revert reason used when the forwarder is called with an unknown selector.
pub const REVERT_UNKNOWN_SELECTOR: &str = "MetaTxRelayer: unknown selector";
/// Revert reason used when a known selector carries arguments that do not decode.
pub const REVERT_MALFORMED_CALL: &str = "MetaTxRelayer: malformed call";

/// SECP256K1 signature length: 32 bytes (r) + 32 bytes (s) + 1 byte (v)
pub const SECP256K1_SIGNATURE_LENGTH: usize = 65;

/// Length of the sender identity appended to forwarded calldata.
pub const FORWARDED_SENDER_LENGTH: usize = 20;

/// Default execution budget a sender grants the forwarded call.
pub const DEFAULT_FORWARD_GAS: u64 = 200_000;
