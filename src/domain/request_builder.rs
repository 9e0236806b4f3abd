//! Sender-side assembly of forward requests.
use alloy::{
    primitives::{Address, Bytes, U256},
    sol_types::SolCall,
};

use crate::{
    constants::DEFAULT_FORWARD_GAS,
    models::{decode_nonce, encode_get_nonce, ForwardRequest},
    services::{NetworkProviderTrait, ProviderError},
};

/// Fills the six fields of a [`ForwardRequest`].
///
/// ```ignore
/// let request = ForwardRequestBuilder::new(sender, greeter)
///     .call(IGreeter::sayHiCall {})
///     .build_with_nonce(&provider, forwarder)
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct ForwardRequestBuilder {
    from: Address,
    to: Address,
    value: U256,
    gas: U256,
    data: Bytes,
}

impl ForwardRequestBuilder {
    pub fn new(from: Address, to: Address) -> Self {
        Self {
            from,
            to,
            value: U256::ZERO,
            gas: U256::from(DEFAULT_FORWARD_GAS),
            data: Bytes::new(),
        }
    }

    pub fn value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    pub fn gas(mut self, gas: u64) -> Self {
        self.gas = U256::from(gas);
        self
    }

    /// ABI-encodes `call` as the target payload.
    pub fn call<C: SolCall>(mut self, call: C) -> Self {
        self.data = call.abi_encode().into();
        self
    }

    pub fn data(mut self, data: impl Into<Bytes>) -> Self {
        self.data = data.into();
        self
    }

    pub fn build(self, nonce: U256) -> ForwardRequest {
        ForwardRequest {
            from: self.from,
            to: self.to,
            value: self.value,
            gas: self.gas,
            nonce,
            data: self.data,
        }
    }

    /// Reads the sender's current nonce from `forwarder` and builds.
    pub async fn build_with_nonce<P: NetworkProviderTrait + ?Sized>(
        self,
        provider: &P,
        forwarder: Address,
    ) -> Result<ForwardRequest, ProviderError> {
        let output = provider
            .call(self.from, forwarder, encode_get_nonce(self.from))
            .await?;
        let nonce = decode_nonce(&output)?;
        Ok(self.build(nonce))
    }
}
