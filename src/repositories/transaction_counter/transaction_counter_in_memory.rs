//! In-memory transaction counter backed by `DashMap`.
use async_trait::async_trait;
use dashmap::DashMap;
use log::debug;

use super::{validate_key, TransactionCounterTrait};
use crate::models::RepositoryError;

#[derive(Debug, Default, Clone)]
pub struct InMemoryTransactionCounter {
    store: DashMap<(String, String), u64>,
}

impl InMemoryTransactionCounter {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(relayer_id: &str, address: &str) -> (String, String) {
        (relayer_id.to_string(), address.to_lowercase())
    }
}

#[async_trait]
impl TransactionCounterTrait for InMemoryTransactionCounter {
    async fn get(&self, relayer_id: &str, address: &str) -> Result<Option<u64>, RepositoryError> {
        validate_key(relayer_id, address)?;
        Ok(self
            .store
            .get(&Self::key(relayer_id, address))
            .map(|value| *value))
    }

    async fn get_and_increment(
        &self,
        relayer_id: &str,
        address: &str,
    ) -> Result<u64, RepositoryError> {
        validate_key(relayer_id, address)?;
        let mut entry = self.store.entry(Self::key(relayer_id, address)).or_insert(0);
        let current = *entry;
        *entry = current
            .checked_add(1)
            .ok_or_else(|| RepositoryError::ConstraintViolation("Counter overflow".to_string()))?;
        debug!("counter for {}/{} incremented from {}", relayer_id, address, current);
        Ok(current)
    }

    async fn decrement(&self, relayer_id: &str, address: &str) -> Result<u64, RepositoryError> {
        validate_key(relayer_id, address)?;
        let mut entry = self
            .store
            .get_mut(&Self::key(relayer_id, address))
            .ok_or_else(|| {
                RepositoryError::NotFound(format!(
                    "Counter not found for relayer {relayer_id} and address {address}"
                ))
            })?;
        *entry = entry.saturating_sub(1);
        debug!("counter for {}/{} decremented to {}", relayer_id, address, *entry);
        Ok(*entry)
    }

    async fn set(
        &self,
        relayer_id: &str,
        address: &str,
        value: u64,
    ) -> Result<(), RepositoryError> {
        validate_key(relayer_id, address)?;
        self.store.insert(Self::key(relayer_id, address), value);
        debug!("counter for {}/{} set to {}", relayer_id, address, value);
        Ok(())
    }
}
