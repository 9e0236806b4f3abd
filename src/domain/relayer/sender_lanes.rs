//! Per-sender submission lanes.
//!
//! Requests from the same sender run one at a time so each is built against
//! the nonce its predecessor left behind. Distinct senders never contend.
use std::sync::Arc;

use alloy::primitives::Address;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub struct SenderLanes {
    lanes: DashMap<Address, Arc<Mutex<()>>>,
}

impl SenderLanes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for the lane of `sender`. The lane is held until the guard drops.
    pub async fn acquire(&self, sender: Address) -> OwnedMutexGuard<()> {
        let lane = self.lanes.entry(sender).or_default().clone();
        lane.lock_owned().await
    }

    /// Drops lanes that nobody holds or waits on.
    pub fn prune(&self) {
        self.lanes.retain(|_, lane| Arc::strong_count(lane) > 1);
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }
}
