//! Request and response bodies of the HTTP boundary.
//!
//! Numbers and byte strings travel as strings (`0x`-hex or decimal) and are
//! parsed into ledger types at the edge.
use std::str::FromStr;

use alloy::primitives::{Address, Bytes, Log, B256, U256};
use serde::{Deserialize, Serialize};
use strum::Display;
use validator::{Validate, ValidationError};

use crate::{
    domain::RelayOutcome,
    models::{ApiError, DomainSeparator, ExecutionRecord, ForwardRequest},
    utils::decode_hex_field,
};

fn validate_address(value: &str) -> Result<(), ValidationError> {
    Address::from_str(value)
        .map(|_| ())
        .map_err(|_| ValidationError::new("invalid_address"))
}

fn validate_uint(value: &str) -> Result<(), ValidationError> {
    U256::from_str(value)
        .map(|_| ())
        .map_err(|_| ValidationError::new("invalid_uint256"))
}

fn validate_hex(value: &str) -> Result<(), ValidationError> {
    decode_hex_field(value, "payload")
        .map(|_| ())
        .map_err(|_| ValidationError::new("invalid_hex"))
}

/// JSON form of a [`ForwardRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ForwardRequestPayload {
    #[validate(custom(function = "validate_address"))]
    pub from: String,
    #[validate(custom(function = "validate_address"))]
    pub to: String,
    #[validate(custom(function = "validate_uint"))]
    pub value: String,
    #[validate(custom(function = "validate_uint"))]
    pub gas: String,
    #[validate(custom(function = "validate_uint"))]
    pub nonce: String,
    #[validate(custom(function = "validate_hex"))]
    pub data: String,
}

impl TryFrom<&ForwardRequestPayload> for ForwardRequest {
    type Error = ApiError;

    fn try_from(payload: &ForwardRequestPayload) -> Result<Self, Self::Error> {
        let address = |value: &str, field: &str| {
            Address::from_str(value)
                .map_err(|e| ApiError::BadRequest(format!("Invalid {}: {}", field, e)))
        };
        let uint = |value: &str, field: &str| {
            U256::from_str(value)
                .map_err(|e| ApiError::BadRequest(format!("Invalid {}: {}", field, e)))
        };

        Ok(ForwardRequest {
            from: address(&payload.from, "from")?,
            to: address(&payload.to, "to")?,
            value: uint(&payload.value, "value")?,
            gas: uint(&payload.gas, "gas")?,
            nonce: uint(&payload.nonce, "nonce")?,
            data: decode_hex_field(&payload.data, "data")
                .map_err(ApiError::BadRequest)?
                .into(),
        })
    }
}

impl From<&ForwardRequest> for ForwardRequestPayload {
    fn from(request: &ForwardRequest) -> Self {
        Self {
            from: request.from.to_checksum(None),
            to: request.to.to_checksum(None),
            value: request.value.to_string(),
            gas: request.gas.to_string(),
            nonce: request.nonce.to_string(),
            data: request.data.to_string(),
        }
    }
}

/// Body of `POST /api/v1/relay`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RelayRequest {
    #[validate(nested)]
    pub request: ForwardRequestPayload,
    #[validate(custom(function = "validate_hex"))]
    pub signature: String,
}

impl RelayRequest {
    /// Parses the body into a request and its raw signature bytes.
    pub fn parse(&self) -> Result<(ForwardRequest, Bytes), ApiError> {
        self.validate()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        let request = ForwardRequest::try_from(&self.request)?;
        let signature = decode_hex_field(&self.signature, "signature")
            .map_err(ApiError::BadRequest)?
            .into();
        Ok((request, signature))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RelayStatus {
    /// Included and settled; `success` tells the target outcome.
    Settled,
    /// Submitted but not observed within the timeout.
    PendingUnknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogResponse {
    pub address: String,
    pub topics: Vec<String>,
    pub data: String,
}

impl From<&Log> for LogResponse {
    fn from(log: &Log) -> Self {
        Self {
            address: log.address.to_checksum(None),
            topics: log.data.topics().iter().map(B256::to_string).collect(),
            data: log.data.data.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRecordResponse {
    pub from: String,
    pub to: String,
    pub success: bool,
}

impl From<&ExecutionRecord> for ExecutionRecordResponse {
    fn from(record: &ExecutionRecord) -> Self {
        Self {
            from: record.from.to_checksum(None),
            to: record.to.to_checksum(None),
            success: record.success,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayResponse {
    pub status: RelayStatus,
    pub tx_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_used: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revert_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<ExecutionRecordResponse>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub logs: Vec<LogResponse>,
}

impl From<&RelayOutcome> for RelayResponse {
    fn from(outcome: &RelayOutcome) -> Self {
        match outcome {
            RelayOutcome::Settled(receipt) => Self {
                status: RelayStatus::Settled,
                tx_hash: receipt.tx_hash.to_string(),
                block_number: Some(receipt.block_number),
                gas_used: Some(receipt.gas_used),
                success: Some(receipt.result.success),
                return_data: Some(receipt.result.return_data.to_string()),
                revert_reason: receipt.result.revert_reason(),
                record: receipt.record.as_ref().map(ExecutionRecordResponse::from),
                logs: receipt.logs.iter().map(LogResponse::from).collect(),
            },
            RelayOutcome::PendingUnknown { tx_hash } => Self {
                status: RelayStatus::PendingUnknown,
                tx_hash: tx_hash.to_string(),
                block_number: None,
                gas_used: None,
                success: None,
                return_data: None,
                revert_reason: None,
                record: None,
                logs: Vec::new(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonceResponse {
    pub address: String,
    pub nonce: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainResponse {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    pub verifying_contract: String,
    pub separator: String,
}

impl From<&DomainSeparator> for DomainResponse {
    fn from(domain: &DomainSeparator) -> Self {
        Self {
            name: domain.name.clone(),
            version: domain.version.clone(),
            chain_id: domain.chain_id,
            verifying_contract: domain.verifying_contract.to_checksum(None),
            separator: domain.separator().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreeterStatusResponse {
    pub address: String,
    pub greeting: String,
    pub last_greeter: String,
    pub greet_count: String,
}
