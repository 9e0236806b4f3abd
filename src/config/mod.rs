//! Configuration of the relayer service.
//!
//! Two sources are combined: environment variables ([`ServerConfig`]) and a
//! JSON file ([`Config`]) describing the network, the forwarder and the relayer.

mod config_file;
pub use config_file::*;

mod server_config;
pub use server_config::*;
