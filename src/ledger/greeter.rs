//! Demo target contract that acts on the effective caller.
use alloy::{
    primitives::{Address, Bytes, U256},
    sol_types::{SolCall, SolEvent, SolInterface},
};
use log::debug;

use super::contract::{CallEnv, Contract, ContractRevert};
use crate::{
    constants::{STORAGE_READ_GAS, STORAGE_UPDATE_GAS, STORAGE_WRITE_GAS},
    domain::{CallerContext, TrustedForwarder},
    models::{
        hi_greeting,
        IGreeter::{self, IGreeterCalls},
        INITIAL_GREETING,
    },
};

#[derive(Debug, Clone)]
pub struct Greeter {
    trusted_forwarder: TrustedForwarder,
    greeting: String,
    last_greeter: Address,
    greet_count: U256,
}

impl Greeter {
    pub fn new(trusted_forwarder: Address) -> Self {
        Self {
            trusted_forwarder: TrustedForwarder::new(trusted_forwarder),
            greeting: INITIAL_GREETING.to_string(),
            last_greeter: Address::ZERO,
            greet_count: U256::ZERO,
        }
    }

    fn greet(
        &mut self,
        env: &mut CallEnv<'_>,
        context: CallerContext,
        greeting: String,
    ) -> Result<Bytes, ContractRevert> {
        if greeting.is_empty() {
            return Err(ContractRevert::with_reason("Greeter: greeting cannot be empty"));
        }

        let sender = context.effective_caller();
        let first_write = if self.greet_count.is_zero() {
            STORAGE_WRITE_GAS
        } else {
            STORAGE_UPDATE_GAS
        };
        env.charge(first_write * 2 + STORAGE_UPDATE_GAS)?;

        self.greeting = greeting;
        self.last_greeter = sender;
        self.greet_count += U256::from(1);

        let event = IGreeter::GreetingSent {
            greeter: sender,
            greeting: self.greeting.clone(),
            greetCount: self.greet_count,
        };
        env.emit(event.encode_log_data())?;

        debug!(
            "greeting #{} set by {} (forwarded: {})",
            self.greet_count,
            sender,
            context.is_forwarded()
        );
        Ok(Bytes::new())
    }
}

impl Contract for Greeter {
    fn name(&self) -> &'static str {
        "Greeter"
    }

    fn call(&mut self, env: &mut CallEnv<'_>, input: &[u8]) -> Result<Bytes, ContractRevert> {
        let (context, payload) = self.trusted_forwarder.resolve(env.caller(), input);
        let call = IGreeterCalls::abi_decode(payload, false)
            .map_err(|_| ContractRevert::with_reason("Greeter: unknown call"))?;

        match call {
            IGreeterCalls::setGreeting(call) => self.greet(env, context, call.greeting),
            IGreeterCalls::sayHi(_) => {
                let greeting = hi_greeting(context.effective_caller());
                self.greet(env, context, greeting)
            }
            IGreeterCalls::getGreeting(_) => {
                env.charge(STORAGE_READ_GAS)?;
                Ok(IGreeter::getGreetingCall::abi_encode_returns(&(self.greeting.clone(),)).into())
            }
            IGreeterCalls::getLastGreeter(_) => {
                env.charge(STORAGE_READ_GAS)?;
                Ok(IGreeter::getLastGreeterCall::abi_encode_returns(&(self.last_greeter,)).into())
            }
            IGreeterCalls::getGreetCount(_) => {
                env.charge(STORAGE_READ_GAS)?;
                Ok(IGreeter::getGreetCountCall::abi_encode_returns(&(self.greet_count,)).into())
            }
            IGreeterCalls::getMessageInfo(_) => {
                env.charge(STORAGE_READ_GAS * 3)?;
                Ok(IGreeter::getMessageInfoCall::abi_encode_returns(&(
                    self.last_greeter,
                    self.greeting.clone(),
                    self.greet_count,
                ))
                .into())
            }
            IGreeterCalls::getCurrentGreeting(_) => {
                env.charge(STORAGE_READ_GAS)?;
                Ok(
                    IGreeter::getCurrentGreetingCall::abi_encode_returns(&(self.greeting.clone(),))
                        .into(),
                )
            }
            IGreeterCalls::getGreetingInfo(_) => {
                env.charge(STORAGE_READ_GAS * 3)?;
                Ok(IGreeter::getGreetingInfoCall::abi_encode_returns(&(
                    self.greeting.clone(),
                    self.last_greeter,
                    self.greet_count,
                ))
                .into())
            }
            IGreeterCalls::isTrustedForwarder(call) => Ok(
                IGreeter::isTrustedForwarderCall::abi_encode_returns(&(self
                    .trusted_forwarder
                    .is_trusted_forwarder(call.forwarder),))
                .into(),
            ),
        }
    }

    fn box_clone(&self) -> Box<dyn Contract> {
        Box::new(self.clone())
    }
}
