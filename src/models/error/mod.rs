mod api;
pub use api::*;

mod forwarder;
pub use forwarder::*;

mod ledger;
pub use ledger::*;

mod relayer;
pub use relayer::*;

mod repository_error;
pub use repository_error::*;

mod signer;
pub use signer::*;
