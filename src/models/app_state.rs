use std::sync::Arc;

use crate::{
    domain::MetaTxRelayer,
    repositories::InMemoryTransactionCounter,
    services::{GreeterClient, LedgerProvider, LocalSigner},
};

pub type DefaultRelayer = MetaTxRelayer<LedgerProvider, LocalSigner, InMemoryTransactionCounter>;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub relayer: Arc<DefaultRelayer>,
    pub greeter: Arc<GreeterClient<LedgerProvider>>,
    pub provider: Arc<LedgerProvider>,
}
