//! # Services Module
//!
//! Network access, signing and contract clients used by the relayer.

mod provider;
pub use provider::*;

mod signer;
pub use signer::*;

mod greeter;
pub use greeter::*;
