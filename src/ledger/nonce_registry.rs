//! Per-sender replay protection for forwarded requests.
use std::collections::HashMap;

use alloy::primitives::{Address, U256};

use crate::models::ForwarderError;

/// Monotonic per-sender counters. Every sender starts at zero; a value is
/// consumed exactly once and entries are never reset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NonceRegistry {
    nonces: HashMap<Address, U256>,
}

impl NonceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next nonce `sender` must use.
    pub fn current(&self, sender: Address) -> U256 {
        self.nonces.get(&sender).copied().unwrap_or(U256::ZERO)
    }

    /// Advances `sender` by one if `expected` is its current nonce.
    ///
    /// Only the dispatcher may advance nonces; a mismatch leaves the entry
    /// untouched.
    pub(in crate::ledger) fn compare_and_increment(
        &mut self,
        sender: Address,
        expected: U256,
    ) -> Result<U256, ForwarderError> {
        let current = self.current(sender);
        if current != expected {
            return Err(ForwarderError::InvalidNonce {
                expected: current,
                provided: expected,
            });
        }
        let next = current + U256::from(1);
        self.nonces.insert(sender, next);
        Ok(next)
    }
}
