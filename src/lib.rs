//! # Meta-Transaction Relayer
//!
//! A trusted forwarder for signed meta-transactions, an in-process execution
//! ledger hosting it, and the relayer service that pays for and submits
//! forwarded calls on behalf of end users.
//!
//! ## Modules
//!
//! * `api` - HTTP routes and controllers
//! * `bootstrap` - Service and network initialization
//! * `config` - Server and file configuration
//! * `constants` - Shared constants
//! * `domain` - Request signing, verification context and the relayer
//! * `ledger` - Execution ledger with the forwarder and greeter contracts
//! * `logging` - Logger setup
//! * `models` - Data structures and error types
//! * `repositories` - Relayer nonce counters
//! * `services` - Network provider, signers and contract clients
//! * `utils` - Encoding, signature and polling helpers

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod domain;
pub mod ledger;
pub mod logging;
pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;
