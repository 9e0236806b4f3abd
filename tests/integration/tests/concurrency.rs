//! Concurrent relays: per-sender serialization, cross-sender parallelism and
//! competing relayers racing on one signed request.

use alloy::primitives::U256;
use futures::future::join_all;
use metatx_relayer::{domain::RelayOutcome, models::RelayerError, services::NetworkProviderTrait};

use crate::integration::common::context::TestContext;

#[tokio::test]
async fn test_requests_of_one_sender_settle_in_order() {
    let ctx = TestContext::new().await.unwrap();
    let sender = TestContext::sender(0x21);
    let (first, first_sig) = ctx.greet_request_at(&sender, "first", 0).await.unwrap();
    let (second, second_sig) = ctx.greet_request_at(&sender, "second", 1).await.unwrap();

    let (a, b) = tokio::join!(
        ctx.relayer().relay(first, first_sig),
        ctx.relayer().relay(second, second_sig)
    );

    assert!(matches!(a.unwrap(), RelayOutcome::Settled(_)));
    assert!(matches!(b.unwrap(), RelayOutcome::Settled(_)));
    assert_eq!(ctx.nonce(sender.address_sync()).await.unwrap(), U256::from(2));
    assert_eq!(ctx.greeter().greeting().await.unwrap(), "second");
}

#[tokio::test]
async fn test_distinct_senders_relay_concurrently() {
    let ctx = TestContext::new().await.unwrap();
    let senders: Vec<_> = (0x31..0x36).map(TestContext::sender).collect();

    let mut requests = Vec::new();
    for sender in &senders {
        requests.push(ctx.greet_request(sender, "hello").await.unwrap());
    }
    let outcomes = join_all(
        requests
            .into_iter()
            .map(|(request, signature)| ctx.relayer().relay(request, signature)),
    )
    .await;

    for outcome in outcomes {
        match outcome.unwrap() {
            RelayOutcome::Settled(receipt) => assert!(receipt.result.success),
            other => panic!("expected a settled relay, got {:?}", other),
        }
    }
    for sender in &senders {
        assert_eq!(ctx.nonce(sender.address_sync()).await.unwrap(), U256::from(1));
    }
    assert_eq!(
        ctx.greeter().greet_count().await.unwrap(),
        U256::from(senders.len())
    );
    assert_eq!(
        ctx.provider()
            .get_transaction_count(TestContext::relayer_address())
            .await
            .unwrap(),
        senders.len() as u64
    );
}

#[tokio::test]
async fn test_competing_relayers_settle_once() {
    let ctx = TestContext::manual_mining().await.unwrap();
    let rival = ctx.extra_relayer(0x4e);
    let sender = TestContext::sender(0x41);
    let (request, signature) = ctx.greet_request(&sender, "raced").await.unwrap();

    // Both pass pre-flight against nonce 0 before either envelope is mined.
    let (ours, theirs, _) = tokio::join!(
        ctx.relayer().relay(request.clone(), signature.clone()),
        rival.relay(request, signature),
        async {
            ctx.wait_for_pending(2).await;
            ctx.mine();
        }
    );

    let results = [ours, theirs];
    let settled = results
        .iter()
        .filter(|result| matches!(result, Ok(RelayOutcome::Settled(_))))
        .count();
    let replayed = results
        .iter()
        .filter(|result| {
            matches!(
                result,
                Err(RelayerError::InvalidNonce { expected, .. }) if *expected == U256::from(1)
            )
        })
        .count();

    assert_eq!(settled, 1);
    assert_eq!(replayed, 1);
    assert_eq!(ctx.nonce(sender.address_sync()).await.unwrap(), U256::from(1));
    assert_eq!(ctx.greeter().greet_count().await.unwrap(), U256::from(1));
}
