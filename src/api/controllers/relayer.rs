//! # Relayer Controller
//!
//! Handles HTTP endpoints for relaying forward requests and for the read
//! state senders need: nonces, the signing domain and target observables.
use std::str::FromStr;

use actix_web::HttpResponse;
use alloy::primitives::{Address, B256};
use log::info;

use crate::models::{
    ApiError, ApiResponse, AppState, DomainResponse, GreeterStatusResponse, NonceResponse,
    RelayRequest, RelayResponse,
};

fn parse_address(value: &str) -> Result<Address, ApiError> {
    Address::from_str(value).map_err(|e| ApiError::BadRequest(format!("Invalid address: {}", e)))
}

/// Relays a signed forward request.
///
/// Rejections that leave the sender's nonce untouched map to 4xx/5xx errors.
/// A settled request answers `200` even when the target declined; `success`
/// and `revert_reason` carry the target outcome.
pub async fn relay(body: RelayRequest, state: &AppState) -> Result<HttpResponse, ApiError> {
    let (request, signature) = body.parse()?;
    info!(
        "relay request from {} to {} with nonce {}",
        request.from, request.to, request.nonce
    );

    let outcome = state.relayer.relay(request, signature).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(RelayResponse::from(&outcome))))
}

pub async fn get_nonce(address: String, state: &AppState) -> Result<HttpResponse, ApiError> {
    let address = parse_address(&address)?;
    let nonce = state.relayer.current_nonce(address).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(NonceResponse {
        address: address.to_checksum(None),
        nonce: nonce.to_string(),
    })))
}

pub async fn get_transaction(tx_hash: String, state: &AppState) -> Result<HttpResponse, ApiError> {
    let tx_hash = B256::from_str(&tx_hash)
        .map_err(|e| ApiError::BadRequest(format!("Invalid transaction hash: {}", e)))?;
    let outcome = state.relayer.transaction_status(tx_hash).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(RelayResponse::from(&outcome))))
}

pub async fn get_domain(state: &AppState) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(DomainResponse::from(
        state.relayer.domain(),
    ))))
}

pub async fn get_greeter(state: &AppState) -> Result<HttpResponse, ApiError> {
    let status = state
        .greeter
        .status()
        .await
        .map_err(|e| ApiError::BadGateway(e.to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(GreeterStatusResponse {
        address: state.greeter.address().to_checksum(None),
        greeting: status.greeting,
        last_greeter: status.last_greeter.to_checksum(None),
        greet_count: status.greet_count.to_string(),
    })))
}
