//! Read-only client for the deployed greeter contract.
use std::sync::Arc;

use alloy::{
    primitives::{Address, Bytes, U256},
    sol_types::SolCall,
};

use crate::{
    models::IGreeter,
    services::{NetworkProviderTrait, ProviderError},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreeterStatus {
    pub greeting: String,
    pub last_greeter: Address,
    pub greet_count: U256,
}

pub struct GreeterClient<P> {
    provider: Arc<P>,
    address: Address,
}

impl<P: NetworkProviderTrait> GreeterClient<P> {
    pub fn new(provider: Arc<P>, address: Address) -> Self {
        Self { provider, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    async fn view<C: SolCall>(&self, call: C) -> Result<C::Return, ProviderError> {
        let output = self
            .provider
            .call(Address::ZERO, self.address, Bytes::from(call.abi_encode()))
            .await?;
        Ok(C::abi_decode_returns(&output, true)?)
    }

    pub async fn greeting(&self) -> Result<String, ProviderError> {
        Ok(self.view(IGreeter::getGreetingCall {}).await?._0)
    }

    pub async fn greet_count(&self) -> Result<U256, ProviderError> {
        Ok(self.view(IGreeter::getGreetCountCall {}).await?._0)
    }

    pub async fn status(&self) -> Result<GreeterStatus, ProviderError> {
        let info = self.view(IGreeter::getMessageInfoCall {}).await?;
        Ok(GreeterStatus {
            greeting: info.greeting,
            last_greeter: info.sender,
            greet_count: info.greetCount,
        })
    }

    pub async fn current_greeting(&self) -> Result<String, ProviderError> {
        Ok(self.view(IGreeter::getCurrentGreetingCall {}).await?._0)
    }

    /// Same observables as [`Self::status`], read through `getGreetingInfo`.
    pub async fn greeting_info(&self) -> Result<GreeterStatus, ProviderError> {
        let info = self.view(IGreeter::getGreetingInfoCall {}).await?;
        Ok(GreeterStatus {
            greeting: info.greeting,
            last_greeter: info.lastGreeter,
            greet_count: info.greetCount,
        })
    }

    pub async fn is_trusted_forwarder(&self, forwarder: Address) -> Result<bool, ProviderError> {
        Ok(self
            .view(IGreeter::isTrustedForwarderCall { forwarder })
            .await?
            ._0)
    }
}
