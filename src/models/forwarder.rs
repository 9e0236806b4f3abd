//! # Forward request codec
//!
//! Canonical, shared encoding of everything a sender signs and a forwarder
//! verifies. Signers and the ledger-resident forwarder never build EIP-712 or
//! ABI data on their own: they go through the functions in this module, so
//! both ends always see byte-identical structured data.
//!
//! ## EIP-712 layout
//!
//! ```text
//! ForwardRequest(address from,address to,uint256 value,uint256 gas,uint256 nonce,bytes data)
//! EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)
//! signing hash = keccak256("\x19\x01" ‖ domainSeparator ‖ hashStruct(request))
//! ```
use std::borrow::Cow;

use alloy::{
    primitives::{Address, Bytes, Log, B256, U256},
    sol,
    sol_types::{Eip712Domain, Revert, SolCall, SolError, SolEvent, SolStruct},
};

use crate::constants::{DEFAULT_FORWARDER_NAME, DEFAULT_FORWARDER_VERSION};

sol! {
    /// Structured payload a sender signs off-line.
    #[derive(Debug, PartialEq, Eq)]
    struct ForwardRequest {
        address from;
        address to;
        uint256 value;
        uint256 gas;
        uint256 nonce;
        bytes data;
    }

    /// Ledger-resident entry points of the forwarder.
    #[derive(Debug, PartialEq, Eq)]
    interface IForwarder {
        event MetaTransactionExecuted(address indexed from, address indexed to, bool success);

        function execute(ForwardRequest req, bytes signature)
            external
            payable
            returns (bool success, bytes returndata);
        function getNonce(address from) external view returns (uint256);
        function verify(ForwardRequest req, bytes signature) external view returns (bool);
        function domainSeparator() external view returns (bytes32);
    }
}

/// Binding of (name, version, chain id, forwarder address) that scopes every
/// signature to one deployment on one network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainSeparator {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    pub verifying_contract: Address,
}

impl DomainSeparator {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        chain_id: u64,
        verifying_contract: Address,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            chain_id,
            verifying_contract,
        }
    }

    /// Domain using the default forwarder name and version.
    pub fn with_defaults(chain_id: u64, verifying_contract: Address) -> Self {
        Self::new(
            DEFAULT_FORWARDER_NAME,
            DEFAULT_FORWARDER_VERSION,
            chain_id,
            verifying_contract,
        )
    }

    pub fn eip712_domain(&self) -> Eip712Domain {
        Eip712Domain::new(
            Some(Cow::Owned(self.name.clone())),
            Some(Cow::Owned(self.version.clone())),
            Some(U256::from(self.chain_id)),
            Some(self.verifying_contract),
            None,
        )
    }

    /// The 32-byte domain separator hash.
    pub fn separator(&self) -> B256 {
        self.eip712_domain().separator()
    }
}

/// Outcome of one forwarded target invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub success: bool,
    pub return_data: Bytes,
}

impl ExecutionResult {
    /// Revert reason carried in `return_data`, if the target reverted with one.
    pub fn revert_reason(&self) -> Option<String> {
        if self.success {
            return None;
        }
        decode_revert_message(&self.return_data)
    }
}

/// Reason of an `Error(string)` revert payload, falling back to the other
/// standard error encodings.
pub fn decode_revert_message(output: &[u8]) -> Option<String> {
    match Revert::abi_decode(output, true) {
        Ok(revert) => Some(revert.reason),
        Err(_) => alloy::sol_types::decode_revert_reason(output),
    }
}

/// Auditable record emitted for every settled execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionRecord {
    pub from: Address,
    pub to: Address,
    pub success: bool,
}

impl ExecutionRecord {
    /// Encodes the record as a log emitted by `forwarder`.
    pub fn to_log(&self, forwarder: Address) -> Log {
        let event = IForwarder::MetaTransactionExecuted {
            from: self.from,
            to: self.to,
            success: self.success,
        };
        Log {
            address: forwarder,
            data: event.encode_log_data(),
        }
    }

    /// Decodes a record from a log, ignoring logs of other events.
    pub fn from_log(log: &Log) -> Option<Self> {
        if log.data.topics().first() != Some(&IForwarder::MetaTransactionExecuted::SIGNATURE_HASH) {
            return None;
        }
        let event = IForwarder::MetaTransactionExecuted::decode_log_data(&log.data, true).ok()?;
        Some(Self {
            from: event.from,
            to: event.to,
            success: event.success,
        })
    }
}

/// EIP-712 `hashStruct` of a forward request.
pub fn struct_hash(request: &ForwardRequest) -> B256 {
    request.eip712_hash_struct()
}

/// Digest a sender signs and the forwarder recovers from.
pub fn signing_hash(request: &ForwardRequest, domain: &DomainSeparator) -> B256 {
    request.eip712_signing_hash(&domain.eip712_domain())
}

/// Appends the verified sender to the target calldata.
pub fn append_sender(data: &[u8], from: Address) -> Bytes {
    let mut forwarded = Vec::with_capacity(data.len() + Address::len_bytes());
    forwarded.extend_from_slice(data);
    forwarded.extend_from_slice(from.as_slice());
    forwarded.into()
}

pub fn encode_execute(request: ForwardRequest, signature: Bytes) -> Bytes {
    IForwarder::executeCall {
        req: request,
        signature,
    }
    .abi_encode()
    .into()
}

pub fn encode_execute_output(result: &ExecutionResult) -> Bytes {
    IForwarder::executeCall::abi_encode_returns(&(result.success, result.return_data.clone()))
        .into()
}

pub fn decode_execute_output(output: &[u8]) -> Result<ExecutionResult, alloy::sol_types::Error> {
    let decoded = IForwarder::executeCall::abi_decode_returns(output, true)?;
    Ok(ExecutionResult {
        success: decoded.success,
        return_data: decoded.returndata,
    })
}

pub fn encode_get_nonce(from: Address) -> Bytes {
    IForwarder::getNonceCall { from }.abi_encode().into()
}

pub fn encode_nonce_output(nonce: U256) -> Bytes {
    IForwarder::getNonceCall::abi_encode_returns(&(nonce,)).into()
}

pub fn decode_nonce(output: &[u8]) -> Result<U256, alloy::sol_types::Error> {
    Ok(IForwarder::getNonceCall::abi_decode_returns(output, true)?._0)
}

pub fn encode_verify(request: ForwardRequest, signature: Bytes) -> Bytes {
    IForwarder::verifyCall {
        req: request,
        signature,
    }
    .abi_encode()
    .into()
}

pub fn encode_verify_output(valid: bool) -> Bytes {
    IForwarder::verifyCall::abi_encode_returns(&(valid,)).into()
}

pub fn decode_verify(output: &[u8]) -> Result<bool, alloy::sol_types::Error> {
    Ok(IForwarder::verifyCall::abi_decode_returns(output, true)?._0)
}

pub fn encode_domain_separator() -> Bytes {
    IForwarder::domainSeparatorCall {}.abi_encode().into()
}

pub fn encode_domain_separator_output(separator: B256) -> Bytes {
    IForwarder::domainSeparatorCall::abi_encode_returns(&(separator,)).into()
}

pub fn decode_domain_separator(output: &[u8]) -> Result<B256, alloy::sol_types::Error> {
    Ok(IForwarder::domainSeparatorCall::abi_decode_returns(output, true)?._0)
}
