//! # Domain Module
//!
//! Core logic of the meta-transaction flow:
//!
//! * Signature verification of forward requests
//! * Effective-caller resolution on the target side
//! * Request assembly for senders
//! * The relayer service that submits requests on behalf of senders

pub mod context;
pub use context::*;

pub mod signature;
pub use signature::*;

mod request_builder;
pub use request_builder::*;

pub mod relayer;
pub use relayer::*;
