//! This module defines the HTTP routes for relaying forward requests.
//! It includes handlers for submitting requests and for reading the state a
//! sender needs to build and sign them.
use crate::{
    api::controllers::relayer,
    models::{AppState, RelayRequest},
};
use actix_web::{get, post, web, Responder};

/// Relays a signed forward request.
#[post("/api/v1/relay")]
async fn relay(body: web::Json<RelayRequest>, data: web::ThinData<AppState>) -> impl Responder {
    relayer::relay(body.into_inner(), &data).await
}

/// Current forwarder nonce of an address.
#[get("/api/v1/nonces/{address}")]
async fn get_nonce(address: web::Path<String>, data: web::ThinData<AppState>) -> impl Responder {
    relayer::get_nonce(address.into_inner(), &data).await
}

/// Status of an earlier submission.
#[get("/api/v1/transactions/{tx_hash}")]
async fn get_transaction(
    tx_hash: web::Path<String>,
    data: web::ThinData<AppState>,
) -> impl Responder {
    relayer::get_transaction(tx_hash.into_inner(), &data).await
}

/// Domain separator parameters for signers.
#[get("/api/v1/domain")]
async fn get_domain(data: web::ThinData<AppState>) -> impl Responder {
    relayer::get_domain(&data).await
}

/// Observable state of the greeter target.
#[get("/api/v1/greeter")]
async fn get_greeter(data: web::ThinData<AppState>) -> impl Responder {
    relayer::get_greeter(&data).await
}

/// Initializes the routes for the relayer module.
pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(relay);
    cfg.service(get_nonce);
    cfg.service(get_transaction);
    cfg.service(get_domain);
    cfg.service(get_greeter);
}
