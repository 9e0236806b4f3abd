//! Constants shared across the forwarder, the ledger and the relayer service.

mod forwarder;
pub use forwarder::*;

mod ledger;
pub use ledger::*;

mod logging;
pub use logging::*;

mod relayer;
pub use relayer::*;

mod server;
pub use server::*;
