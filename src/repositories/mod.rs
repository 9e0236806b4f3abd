//! # Repository Module
//!
//! Persistence layer of the relayer, following the repository pattern.

mod transaction_counter;
pub use transaction_counter::*;
