//! Execution ledger defaults and gas schedule.

/// Chain id used by the in-process development network.
pub const DEFAULT_CHAIN_ID: u64 = 31337;
/// Gas price charged by the in-process development network: 1 gwei in wei
pub const DEFAULT_GAS_PRICE: u128 = 1_000_000_000;

// === Gas schedule ===
pub const TX_INTRINSIC_GAS: u64 = 21_000;
pub const CALLDATA_ZERO_BYTE_GAS: u64 = 4;
pub const CALLDATA_NONZERO_BYTE_GAS: u64 = 16;
/// Flat charge for signature recovery, nonce bookkeeping and the execution record.
pub const FORWARDER_EXECUTION_GAS: u64 = 30_000;
pub const STORAGE_READ_GAS: u64 = 2_100;
pub const STORAGE_WRITE_GAS: u64 = 20_000;
pub const STORAGE_UPDATE_GAS: u64 = 5_000;
pub const LOG_BASE_GAS: u64 = 375;
pub const LOG_TOPIC_GAS: u64 = 375;
pub const LOG_DATA_BYTE_GAS: u64 = 8;

/// Gas budget for read-only calls.
pub const VIEW_CALL_GAS_LIMIT: u64 = 10_000_000;
