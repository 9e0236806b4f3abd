mod api_response;
pub use api_response::*;

mod app_state;
pub use app_state::*;

mod error;
pub use error::*;

mod forwarder;
pub use forwarder::*;

mod greeter;
pub use greeter::*;

mod relay;
pub use relay::*;

mod transaction;
pub use transaction::*;
