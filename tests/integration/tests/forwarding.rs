//! End-to-end forwarding through the relayer: nonce accounting, replay and
//! tamper protection, target failures and direct-call equivalence.

use std::time::Duration;

use alloy::{
    primitives::{Address, Bytes, B256, U256},
    sol_types::{SolCall, SolEvent},
};
use metatx_relayer::{
    domain::{ForwardRequestBuilder, RelayOutcome, RelayReceipt},
    models::{
        hi_greeting, ExecutionRecord, IGreeter, RelayerError, TransactionEnvelope,
        TransactionStatus, INITIAL_GREETING,
    },
    services::{NetworkProviderTrait, Signer},
};

use crate::integration::common::context::TestContext;

fn settled(outcome: RelayOutcome) -> RelayReceipt {
    match outcome {
        RelayOutcome::Settled(receipt) => receipt,
        other => panic!("expected a settled relay, got {:?}", other),
    }
}

#[tokio::test]
async fn test_greet_scenario() {
    let ctx = TestContext::new().await.unwrap();
    let sender = TestContext::sender(0x11);
    let from = sender.address_sync();
    assert_eq!(ctx.nonce(from).await.unwrap(), U256::ZERO);

    let (request, signature) = ctx.greet_request(&sender, "gm").await.unwrap();
    let receipt = settled(ctx.relayer().relay(request, signature).await.unwrap());

    assert!(receipt.result.success);
    assert_eq!(
        receipt.record,
        Some(ExecutionRecord {
            from,
            to: ctx.network.greeter,
            success: true,
        })
    );
    let greeting_event = receipt
        .logs
        .iter()
        .filter(|log| log.address == ctx.network.greeter)
        .find_map(|log| IGreeter::GreetingSent::decode_log(log, true).ok())
        .expect("greeter event");
    assert_eq!(greeting_event.data.greeter, from);

    let status = ctx.greeter().status().await.unwrap();
    assert_eq!(status.last_greeter, from);
    assert_eq!(status.greeting, "gm");
    assert_eq!(status.greet_count, U256::from(1));
    assert_eq!(ctx.nonce(from).await.unwrap(), U256::from(1));
}

#[tokio::test]
async fn test_forwarded_say_hi_greets_as_sender() {
    let ctx = TestContext::new().await.unwrap();
    let sender = TestContext::sender(0x19);
    let from = sender.address_sync();

    let request = ForwardRequestBuilder::new(from, ctx.network.greeter)
        .call(IGreeter::sayHiCall {})
        .build_with_nonce(ctx.provider().as_ref(), ctx.network.forwarder)
        .await
        .unwrap();
    let signature = ctx.sign(&sender, &request).await.unwrap();
    settled(ctx.relayer().relay(request, signature).await.unwrap());

    assert_eq!(ctx.greeter().greeting().await.unwrap(), hi_greeting(from));
    assert_eq!(
        ctx.greeter().current_greeting().await.unwrap(),
        hi_greeting(from)
    );
    let info = ctx.greeter().greeting_info().await.unwrap();
    assert_eq!(info, ctx.greeter().status().await.unwrap());
    assert_eq!(info.last_greeter, from);
    assert!(ctx
        .greeter()
        .is_trusted_forwarder(ctx.network.forwarder)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_verbatim_resubmission_is_rejected() {
    let ctx = TestContext::new().await.unwrap();
    let sender = TestContext::sender(0x12);
    let from = sender.address_sync();
    let (request, signature) = ctx.greet_request(&sender, "once").await.unwrap();

    ctx.relayer()
        .relay(request.clone(), signature.clone())
        .await
        .unwrap();
    let before = ctx.greeter().status().await.unwrap();

    let result = ctx.relayer().relay(request, signature).await;

    match result {
        Err(RelayerError::InvalidNonce { expected, provided }) => {
            assert_eq!(expected, U256::from(1));
            assert_eq!(provided, U256::ZERO);
        }
        other => panic!("expected InvalidNonce, got {:?}", other),
    }
    assert_eq!(ctx.greeter().status().await.unwrap(), before);
    assert_eq!(ctx.nonce(from).await.unwrap(), U256::from(1));
}

#[tokio::test]
async fn test_mutated_request_fails_signature_check() {
    let ctx = TestContext::new().await.unwrap();
    let sender = TestContext::sender(0x13);
    let (request, signature) = ctx.greet_request(&sender, "original").await.unwrap();

    let mut other_target = request.clone();
    other_target.to = Address::repeat_byte(0x99);
    let mut other_data = request.clone();
    other_data.data = Bytes::from(IGreeter::sayHiCall {}.abi_encode());
    let mut other_value = request.clone();
    other_value.value = U256::from(1);

    for tampered in [other_target, other_data, other_value] {
        let result = ctx.relayer().relay(tampered, signature.clone()).await;
        assert!(
            matches!(result, Err(RelayerError::SignatureInvalid)),
            "got {:?}",
            result
        );
    }

    assert_eq!(ctx.nonce(sender.address_sync()).await.unwrap(), U256::ZERO);
    assert_eq!(ctx.greeter().greeting().await.unwrap(), INITIAL_GREETING);

    // The untouched request still goes through.
    settled(ctx.relayer().relay(request, signature).await.unwrap());
    assert_eq!(ctx.greeter().greeting().await.unwrap(), "original");
}

#[tokio::test]
async fn test_zero_signature_is_rejected_before_nonce_check() {
    let ctx = TestContext::new().await.unwrap();
    let sender = TestContext::sender(0x14);
    // Stale nonce as well, so a nonce-first check would answer InvalidNonce.
    let (request, _) = ctx.greet_request_at(&sender, "zero", 7).await.unwrap();

    let result = ctx
        .relayer()
        .relay(request, Bytes::from(vec![0u8; 65]))
        .await;

    assert!(matches!(result, Err(RelayerError::SignatureInvalid)));
    assert_eq!(ctx.nonce(sender.address_sync()).await.unwrap(), U256::ZERO);
}

#[tokio::test]
async fn test_target_failure_consumes_nonce() {
    let ctx = TestContext::new().await.unwrap();
    let sender = TestContext::sender(0x15);
    let from = sender.address_sync();

    let (request, signature) = ctx.greet_request(&sender, "").await.unwrap();
    let receipt = settled(ctx.relayer().relay(request, signature).await.unwrap());

    assert!(!receipt.result.success);
    assert!(receipt
        .result
        .revert_reason()
        .unwrap_or_default()
        .contains("greeting cannot be empty"));
    assert_eq!(
        receipt.record,
        Some(ExecutionRecord {
            from,
            to: ctx.network.greeter,
            success: false,
        })
    );
    assert_eq!(ctx.nonce(from).await.unwrap(), U256::from(1));
    assert_eq!(ctx.greeter().greet_count().await.unwrap(), U256::ZERO);
    assert!(matches!(
        receipt.into_result(),
        Err(RelayerError::TargetExecutionFailed { .. })
    ));

    let (request, signature) = ctx.greet_request(&sender, "retry").await.unwrap();
    assert_eq!(request.nonce, U256::from(1));
    let receipt = settled(ctx.relayer().relay(request, signature).await.unwrap());

    assert!(receipt.result.success);
    assert_eq!(ctx.nonce(from).await.unwrap(), U256::from(2));
}

#[tokio::test]
async fn test_direct_and_forwarded_calls_agree() {
    let forwarded = TestContext::new().await.unwrap();
    let direct = TestContext::new().await.unwrap();
    let sender = TestContext::sender(0x16);
    let from = sender.address_sync();
    let relayer = TestContext::relayer_address();

    let relayer_before = forwarded.balance(relayer);
    let (request, signature) = forwarded.greet_request(&sender, "same intent").await.unwrap();
    let receipt = settled(forwarded.relayer().relay(request, signature).await.unwrap());
    let envelope_fee = forwarded
        .provider()
        .get_transaction_receipt(receipt.tx_hash)
        .await
        .unwrap()
        .unwrap()
        .fee();

    let funding = U256::from(10u64).pow(U256::from(18));
    direct.fund(from, funding);
    let chain_id = direct.provider().get_chain_id().await.unwrap();
    let envelope = TransactionEnvelope {
        chain_id,
        nonce: direct.provider().get_transaction_count(from).await.unwrap(),
        to: direct.network.greeter,
        value: U256::ZERO,
        gas_limit: 200_000,
        data: IGreeter::setGreetingCall {
            greeting: "same intent".to_string(),
        }
        .abi_encode()
        .into(),
    };
    let signed = sender.sign_transaction(envelope).await.unwrap();
    let tx_hash = direct.provider().send_transaction(signed).await.unwrap();
    let direct_receipt = direct
        .provider()
        .get_transaction_receipt(tx_hash)
        .await
        .unwrap()
        .unwrap();
    assert!(direct_receipt.success);

    assert_eq!(
        forwarded.greeter().status().await.unwrap(),
        direct.greeter().status().await.unwrap()
    );

    assert_eq!(forwarded.balance(from), U256::ZERO);
    assert_eq!(forwarded.balance(relayer), relayer_before - envelope_fee);
    assert_eq!(direct.balance(from), funding - direct_receipt.fee());
}

#[tokio::test]
async fn test_unobserved_inclusion_reports_pending() {
    let ctx = TestContext::manual_mining().await.unwrap();
    let sender = TestContext::sender(0x17);
    let (request, signature) = ctx.greet_request(&sender, "later").await.unwrap();

    let outcome = ctx
        .relayer()
        .relay_with_timeout(request, signature, Duration::from_millis(30))
        .await
        .unwrap();

    let tx_hash = match outcome {
        RelayOutcome::PendingUnknown { tx_hash } => tx_hash,
        other => panic!("expected PendingUnknown, got {:?}", other),
    };
    assert_eq!(
        ctx.provider().get_transaction_status(tx_hash).await.unwrap(),
        TransactionStatus::Pending
    );
    assert!(matches!(
        ctx.relayer().transaction_status(tx_hash).await.unwrap(),
        RelayOutcome::PendingUnknown { .. }
    ));

    ctx.mine();

    let receipt = settled(ctx.relayer().transaction_status(tx_hash).await.unwrap());
    assert!(receipt.result.success);
    assert_eq!(ctx.greeter().greeting().await.unwrap(), "later");
    assert_eq!(ctx.nonce(sender.address_sync()).await.unwrap(), U256::from(1));
}

#[tokio::test]
async fn test_block_producer_settles_relays() {
    let ctx = TestContext::manual_mining().await.unwrap();
    let producer = ctx.provider().spawn_block_producer(Duration::from_millis(10));
    let sender = TestContext::sender(0x18);

    let (request, signature) = ctx.greet_request(&sender, "ticked").await.unwrap();
    let receipt = settled(ctx.relayer().relay(request, signature).await.unwrap());
    producer.abort();

    assert!(receipt.result.success);
    assert!(receipt.block_number >= 1);
}

#[tokio::test]
async fn test_unknown_transaction_status() {
    let ctx = TestContext::new().await.unwrap();

    let result = ctx
        .relayer()
        .transaction_status(B256::repeat_byte(0xab))
        .await;

    assert!(matches!(result, Err(RelayerError::Provider(_))));
}
