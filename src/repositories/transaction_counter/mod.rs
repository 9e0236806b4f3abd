//! Transaction Counter Repository Module
//!
//! Tracks the next envelope nonce the relayer will use for each
//! (relayer, address) pair, so concurrent submissions never share a nonce.
//!
//! ## Counter Operations
//!
//! - **Get**: Retrieve current counter value
//! - **Get and Increment**: Atomically get current value and increment
//! - **Decrement**: Decrement counter (for rollbacks)
//! - **Set**: Set counter to specific value
//!
pub mod transaction_counter_in_memory;

pub use transaction_counter_in_memory::InMemoryTransactionCounter;

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::models::RepositoryError;

#[allow(dead_code)]
#[async_trait]
#[cfg_attr(test, automock)]
pub trait TransactionCounterTrait: Send + Sync {
    async fn get(&self, relayer_id: &str, address: &str) -> Result<Option<u64>, RepositoryError>;

    async fn get_and_increment(
        &self,
        relayer_id: &str,
        address: &str,
    ) -> Result<u64, RepositoryError>;

    async fn decrement(&self, relayer_id: &str, address: &str) -> Result<u64, RepositoryError>;

    async fn set(&self, relayer_id: &str, address: &str, value: u64)
        -> Result<(), RepositoryError>;
}

pub(crate) fn validate_key(relayer_id: &str, address: &str) -> Result<(), RepositoryError> {
    if relayer_id.is_empty() {
        return Err(RepositoryError::InvalidData(
            "Relayer ID cannot be empty".to_string(),
        ));
    }

    if address.is_empty() {
        return Err(RepositoryError::InvalidData(
            "Address cannot be empty".to_string(),
        ));
    }
    Ok(())
}
