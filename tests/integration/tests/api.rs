//! HTTP API tests against the full in-process stack.

use actix_web::{body::MessageBody, dev::ServiceResponse, http::StatusCode, test, App};
use alloy::primitives::{Bytes, U256};
use metatx_relayer::{
    api::routes::configure_routes,
    models::{
        ApiResponse, DomainResponse, ForwardRequestPayload, GreeterStatusResponse, NonceResponse,
        RelayRequest, RelayResponse, RelayStatus,
    },
};
use serde::de::DeserializeOwned;

use crate::integration::common::context::TestContext;

macro_rules! init_app {
    ($ctx:expr) => {
        test::init_service(
            App::new()
                .app_data($ctx.state.clone())
                .configure(configure_routes),
        )
        .await
    };
}

async fn read<T: DeserializeOwned, B: MessageBody>(response: ServiceResponse<B>) -> ApiResponse<T> {
    let body = test::read_body(response).await;
    serde_json::from_slice(&body).expect("json body")
}

async fn relay_body(ctx: &TestContext, seed: u8, greeting: &str) -> RelayRequest {
    let sender = TestContext::sender(seed);
    let (request, signature) = ctx.greet_request(&sender, greeting).await.unwrap();
    RelayRequest {
        request: ForwardRequestPayload::from(&request),
        signature: signature.to_string(),
    }
}

#[actix_web::test]
async fn test_health() {
    let ctx = TestContext::new().await.unwrap();
    let app = init_app!(ctx);

    let request = test::TestRequest::get().uri("/health").to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_domain_matches_forwarder() {
    let ctx = TestContext::new().await.unwrap();
    let app = init_app!(ctx);

    let response = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/domain").to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: ApiResponse<DomainResponse> = read(response).await;
    let domain = body.data.unwrap();
    assert_eq!(domain.chain_id, ctx.network.domain.chain_id);
    assert_eq!(
        domain.verifying_contract,
        ctx.network.forwarder.to_checksum(None)
    );
    assert_eq!(domain.separator, ctx.network.domain.separator().to_string());
}

#[actix_web::test]
async fn test_relay_then_replay() {
    let ctx = TestContext::new().await.unwrap();
    let app = init_app!(ctx);
    let body = relay_body(&ctx, 0x51, "over http").await;
    let from = body.request.from.clone();

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/relay")
            .set_json(&body)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let relayed: ApiResponse<RelayResponse> = read(response).await;
    let relayed = relayed.data.unwrap();
    assert_eq!(relayed.status, RelayStatus::Settled);
    assert_eq!(relayed.success, Some(true));
    let record = relayed.record.unwrap();
    assert_eq!(record.from, from);
    assert!(record.success);

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/nonces/{}", from))
            .to_request(),
    )
    .await;
    let nonce: ApiResponse<NonceResponse> = read(response).await;
    assert_eq!(nonce.data.unwrap().nonce, "1");

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/transactions/{}", relayed.tx_hash))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let status: ApiResponse<RelayResponse> = read(response).await;
    assert_eq!(status.data.unwrap().tx_hash, relayed.tx_hash);

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/relay")
            .set_json(&body)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let rejected: ApiResponse<()> = read(response).await;
    assert!(!rejected.success);
    assert!(rejected.error.unwrap().contains("Invalid nonce"));

    let response = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/greeter").to_request(),
    )
    .await;
    let greeter: ApiResponse<GreeterStatusResponse> = read(response).await;
    let greeter = greeter.data.unwrap();
    assert_eq!(greeter.greeting, "over http");
    assert_eq!(greeter.last_greeter, from);
    assert_eq!(greeter.greet_count, "1");
}

#[actix_web::test]
async fn test_forged_signature_is_bad_request() {
    let ctx = TestContext::new().await.unwrap();
    let app = init_app!(ctx);
    let mut body = relay_body(&ctx, 0x52, "forged").await;
    body.signature = Bytes::from(vec![0u8; 65]).to_string();

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/relay")
            .set_json(&body)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let sender = TestContext::sender(0x52).address_sync();
    assert_eq!(ctx.nonce(sender).await.unwrap(), U256::ZERO);
}

#[actix_web::test]
async fn test_target_failure_is_settled_unsuccessful() {
    let ctx = TestContext::new().await.unwrap();
    let app = init_app!(ctx);
    let body = relay_body(&ctx, 0x53, "").await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/relay")
            .set_json(&body)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let relayed: ApiResponse<RelayResponse> = read(response).await;
    let relayed = relayed.data.unwrap();
    assert_eq!(relayed.status, RelayStatus::Settled);
    assert_eq!(relayed.success, Some(false));
    assert!(relayed.revert_reason.is_some());
}

#[actix_web::test]
async fn test_malformed_body_is_bad_request() {
    let ctx = TestContext::new().await.unwrap();
    let app = init_app!(ctx);
    let mut body = relay_body(&ctx, 0x54, "malformed").await;
    body.request.from = "not-an-address".to_string();

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/relay")
            .set_json(&body)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_unknown_transaction_is_not_found() {
    let ctx = TestContext::new().await.unwrap();
    let app = init_app!(ctx);

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/transactions/0x{}", "ab".repeat(32)))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
