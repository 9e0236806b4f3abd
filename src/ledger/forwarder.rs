//! Ledger-resident dispatcher for signed forward requests.
//!
//! `execute` moves every submission through
//! `Received → SignatureChecked → NonceChecked → Invoking → Settled`.
//! A bad signature or nonce reverts the whole submission before any state
//! changes. Once the nonce is consumed the target is invoked in its own frame;
//! a failing target rolls back only its own effects and the submission still
//! settles with `success = false`.
use alloy::{
    primitives::{Address, Bytes},
    sol_types::SolInterface,
};
use log::{debug, trace};
use strum::Display;

use super::{
    contract::{CallEnv, Contract, ContractRevert},
    nonce_registry::NonceRegistry,
};
use crate::{
    constants::{
        FORWARDER_EXECUTION_GAS, REVERT_MALFORMED_CALL, REVERT_UNKNOWN_SELECTOR,
        STORAGE_READ_GAS, STORAGE_UPDATE_GAS,
    },
    domain::verify_forward_request,
    models::{
        append_sender, encode_domain_separator_output, encode_execute_output,
        encode_nonce_output, encode_verify_output, DomainSeparator, ExecutionRecord,
        ExecutionResult, ForwardRequest, IForwarder::IForwarderCalls,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display)]
#[strum(serialize_all = "snake_case")]
pub enum DispatchStage {
    Received,
    SignatureChecked,
    NonceChecked,
    Invoking,
    Settled,
}

#[derive(Debug, Clone)]
pub struct Forwarder {
    domain: DomainSeparator,
    nonces: NonceRegistry,
}

impl Forwarder {
    pub fn new(domain: DomainSeparator) -> Self {
        Self {
            domain,
            nonces: NonceRegistry::new(),
        }
    }

    pub fn domain(&self) -> &DomainSeparator {
        &self.domain
    }

    pub fn nonces(&self) -> &NonceRegistry {
        &self.nonces
    }

    fn execute(
        &mut self,
        env: &mut CallEnv<'_>,
        request: ForwardRequest,
        signature: &[u8],
    ) -> Result<ExecutionResult, ContractRevert> {
        let from = request.from;
        trace!("forward request from {}: {}", from, DispatchStage::Received);

        verify_forward_request(&request, signature, &self.domain)?;
        trace!("forward request from {}: {}", from, DispatchStage::SignatureChecked);

        env.charge(STORAGE_READ_GAS + STORAGE_UPDATE_GAS)?;
        self.nonces.compare_and_increment(from, request.nonce)?;
        trace!("forward request from {}: {}", from, DispatchStage::NonceChecked);

        let payload = append_sender(&request.data, from);
        let gas_limit = request.gas.saturating_to::<u64>();
        trace!(
            "forward request from {}: {} {} with {} gas",
            from,
            DispatchStage::Invoking,
            request.to,
            gas_limit
        );
        let outcome = env.call(request.to, request.value, &payload, gas_limit);

        let result = ExecutionResult {
            success: outcome.success(),
            return_data: outcome.output(),
        };
        let record = ExecutionRecord {
            from,
            to: request.to,
            success: result.success,
        };
        let forwarder = env.address();
        env.emit(record.to_log(forwarder).data)?;

        debug!(
            "forward request from {} nonce {} {}: target success = {}",
            from,
            request.nonce,
            DispatchStage::Settled,
            result.success
        );
        Ok(result)
    }

    /// Read-only check: the signature verifies and the nonce is current.
    fn verify(&self, request: &ForwardRequest, signature: &[u8]) -> bool {
        verify_forward_request(request, signature, &self.domain).is_ok()
            && self.nonces.current(request.from) == request.nonce
    }

    fn nonce_of(&self, env: &mut CallEnv<'_>, from: Address) -> Result<Bytes, ContractRevert> {
        env.charge(STORAGE_READ_GAS)?;
        Ok(encode_nonce_output(self.nonces.current(from)))
    }
}

impl Contract for Forwarder {
    fn name(&self) -> &'static str {
        "Forwarder"
    }

    fn call(&mut self, env: &mut CallEnv<'_>, input: &[u8]) -> Result<Bytes, ContractRevert> {
        env.charge(FORWARDER_EXECUTION_GAS)?;

        let call = IForwarderCalls::abi_decode(input, true).map_err(|_| {
            let known = input
                .get(..4)
                .and_then(|selector| <[u8; 4]>::try_from(selector).ok())
                .is_some_and(IForwarderCalls::valid_selector);
            if known {
                ContractRevert::with_reason(REVERT_MALFORMED_CALL)
            } else {
                ContractRevert::with_reason(REVERT_UNKNOWN_SELECTOR)
            }
        })?;

        match call {
            IForwarderCalls::execute(call) => {
                let result = self.execute(env, call.req, &call.signature)?;
                Ok(encode_execute_output(&result))
            }
            IForwarderCalls::getNonce(call) => self.nonce_of(env, call.from),
            IForwarderCalls::verify(call) => {
                let valid = self.verify(&call.req, &call.signature);
                Ok(encode_verify_output(valid))
            }
            IForwarderCalls::domainSeparator(_) => {
                Ok(encode_domain_separator_output(self.domain.separator()))
            }
        }
    }

    fn box_clone(&self) -> Box<dyn Contract> {
        Box::new(self.clone())
    }
}
