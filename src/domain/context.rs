//! Recovery of the effective caller on the target side of a forwarded call.
//!
//! A trusted forwarder appends the verified sender's 20-byte address to the
//! calldata. Targets resolve every invocation through [`TrustedForwarder`] and
//! act on [`CallerContext::effective_caller`], never on the raw suffix.
use alloy::primitives::Address;

use crate::constants::FORWARDED_SENDER_LENGTH;

/// Caller identity relayed by a trusted forwarder.
///
/// Fields are private: a value only exists once [`TrustedForwarder::resolve`]
/// has matched the literal caller against the trusted address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForwardedCaller {
    forwarder: Address,
    effective: Address,
}

impl ForwardedCaller {
    pub fn forwarder(&self) -> Address {
        self.forwarder
    }

    pub fn effective(&self) -> Address {
        self.effective
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerContext {
    /// Invoked directly; the literal caller is the effective caller.
    Direct(Address),
    /// Invoked through the trusted forwarder on behalf of a verified sender.
    Forwarded(ForwardedCaller),
}

impl CallerContext {
    /// Identity the target should act on.
    pub fn effective_caller(&self) -> Address {
        match self {
            CallerContext::Direct(caller) => *caller,
            CallerContext::Forwarded(forwarded) => forwarded.effective(),
        }
    }

    /// Account that literally invoked the target.
    pub fn literal_caller(&self) -> Address {
        match self {
            CallerContext::Direct(caller) => *caller,
            CallerContext::Forwarded(forwarded) => forwarded.forwarder(),
        }
    }

    pub fn is_forwarded(&self) -> bool {
        matches!(self, CallerContext::Forwarded(_))
    }
}

/// The single forwarder a target trusts to append sender identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrustedForwarder(Address);

impl TrustedForwarder {
    pub fn new(address: Address) -> Self {
        Self(address)
    }

    pub fn address(&self) -> Address {
        self.0
    }

    pub fn is_trusted_forwarder(&self, candidate: Address) -> bool {
        self.0 == candidate
    }

    /// Splits `input` into the caller context and the payload the target
    /// should decode.
    ///
    /// The 20-byte suffix is only honoured when the literal caller is the
    /// trusted forwarder; from anyone else the input is passed through
    /// unchanged and the literal caller is the effective caller.
    pub fn resolve<'a>(
        &self,
        literal_caller: Address,
        input: &'a [u8],
    ) -> (CallerContext, &'a [u8]) {
        if self.is_trusted_forwarder(literal_caller) && input.len() >= FORWARDED_SENDER_LENGTH {
            let split = input.len() - FORWARDED_SENDER_LENGTH;
            let context = CallerContext::Forwarded(ForwardedCaller {
                forwarder: literal_caller,
                effective: Address::from_slice(&input[split..]),
            });
            return (context, &input[..split]);
        }
        (CallerContext::Direct(literal_caller), input)
    }
}
