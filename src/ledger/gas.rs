//! Gas accounting for ledger execution.
use std::fmt;

/// Raised when a charge would exceed the meter's limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfGas {
    pub limit: u64,
    pub requested: u64,
}

impl fmt::Display for OutOfGas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "out of gas: limit {}, requested {}", self.limit, self.requested)
    }
}

/// Tracks gas usage of one call frame against a fixed limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasMeter {
    limit: u64,
    used: u64,
}

impl GasMeter {
    pub fn new(limit: u64) -> Self {
        Self { limit, used: 0 }
    }

    pub fn used(&self) -> u64 {
        self.used
    }

    pub fn remaining(&self) -> u64 {
        self.limit - self.used
    }

    /// Consumes `amount`. On failure the meter is exhausted, mirroring a frame
    /// that burns its whole allowance when it runs out.
    pub fn charge(&mut self, amount: u64) -> Result<(), OutOfGas> {
        let next = self.used.saturating_add(amount);
        if next > self.limit {
            let requested = next;
            self.used = self.limit;
            return Err(OutOfGas {
                limit: self.limit,
                requested,
            });
        }
        self.used = next;
        Ok(())
    }

    /// Adds gas consumed by a child frame, capped at the limit.
    pub fn absorb(&mut self, amount: u64) {
        self.used = self.used.saturating_add(amount).min(self.limit);
    }
}
