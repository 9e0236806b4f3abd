//! Default constants for the relayer service.

/// Default time to wait for a submission to be included: 30 seconds
pub const DEFAULT_SUBMISSION_TIMEOUT_MS: u64 = 30_000;
/// Default interval between receipt lookups while waiting for inclusion
pub const DEFAULT_RECEIPT_POLL_INTERVAL_MS: u64 = 250;
/// Extra gas added on top of the forwarded budget when sizing the envelope
pub const DEFAULT_FORWARDING_GAS_OVERHEAD: u64 = 10_000;
/// Default block time of the in-process development network
pub const DEFAULT_BLOCK_TIME_MS: u64 = 1_000;
/// Balance credited to the relayer at genesis of the development network: 100 ETH in wei
pub const DEFAULT_RELAYER_FUNDING_WEI: u128 = 100_000_000_000_000_000_000;
