//! Initialization routines for the relayer service
//!
//! # Submodules
//!
//! - `initialize_network`: Genesis of the in-process development network
//! - `initialize_app_state`: Signer, provider, relayer and application state
mod initialize_network;
pub use initialize_network::*;

mod initialize_app_state;
pub use initialize_app_state::*;
