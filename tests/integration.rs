//! End-to-end exchange scenarios through the service layer.

#![allow(clippy::panic)]

use std::sync::Arc;

use dex_ledger::bank::MemoryBank;
use dex_ledger::domain::{Address, EventBus, FeeBps, PairKey, PoolRegistry, TokenRegistry};
use dex_ledger::error::DexError;
use dex_ledger::service::DexService;

fn addr(byte: u8) -> Address {
    Address::from_bytes([byte; 20])
}

fn alice() -> Address {
    addr(0xA1)
}

fn bob() -> Address {
    addr(0xB0)
}

fn make_service() -> DexService {
    DexService::new(
        Arc::new(TokenRegistry::new()),
        Arc::new(PoolRegistry::new()),
        Arc::new(MemoryBank::new()),
        EventBus::new(1_000),
        FeeBps::DEFAULT,
        100,
    )
}

/// Creates two tokens owned by `alice` with the given supplies and a
/// pool between them.
async fn setup_pair(service: &DexService, supply_a: u128, supply_b: u128) -> (Address, Address) {
    let Ok(a) = service.create_token("Token A", "TKA", supply_a, alice()).await else {
        panic!("token creation failed");
    };
    let Ok(b) = service.create_token("Token B", "TKB", supply_b, alice()).await else {
        panic!("token creation failed");
    };
    let Ok(_) = service.create_pool(a.address, b.address).await else {
        panic!("pool creation failed");
    };
    (a.address, b.address)
}

#[tokio::test]
async fn token_listing_preserves_creation_order() {
    let service = make_service();
    let Ok(usdc) = service
        .create_token("USD Coin", "USDC", 1_000_000, alice())
        .await
    else {
        panic!("token creation failed");
    };
    let Ok(wbtc) = service
        .create_token("Wrapped Bitcoin", "WBTC", 21_000, bob())
        .await
    else {
        panic!("token creation failed");
    };

    let all = service.all_tokens().await;
    assert_eq!(all.len(), 2);
    assert_eq!(all.first().map(|r| r.address), Some(usdc.address));
    assert_eq!(all.get(1).map(|r| r.address), Some(wbtc.address));

    let mine = service.user_tokens(alice()).await;
    assert_eq!(mine.len(), 1);
    assert_eq!(mine.first().map(|r| r.symbol.as_str()), Some("USDC"));

    let Ok(balance) = service.balance_of(usdc.address, alice()).await else {
        panic!("expected Ok");
    };
    assert_eq!(balance, 1_000_000);
}

#[tokio::test]
async fn pool_creation_is_idempotent_across_token_order() {
    let service = make_service();
    let (token_a, token_b) = setup_pair(&service, 1_000_000, 1_000_000).await;

    let Ok((summary, created)) = service.create_pool(token_b, token_a).await else {
        panic!("expected Ok");
    };
    assert!(!created);

    let Ok(expected_pair) = PairKey::new(token_a, token_b) else {
        panic!("valid pair");
    };
    assert_eq!(summary.pair, expected_pair);
    assert_eq!(service.pools().len().await, 1);
}

#[tokio::test]
async fn genesis_deposit_mints_geometric_mean_shares() {
    let service = make_service();
    let (token_a, token_b) = setup_pair(&service, 1_000_000, 1_000_000).await;

    let Ok(outcome) = service
        .add_liquidity(token_a, 40_000, token_b, 90_000, alice())
        .await
    else {
        panic!("expected Ok");
    };
    // isqrt(40_000 * 90_000) = 60_000
    assert_eq!(outcome.shares_minted, 60_000);
    assert_eq!(outcome.total_shares, 60_000);
}

#[tokio::test]
async fn swap_matches_reference_arithmetic_and_grows_k() {
    let service = make_service();
    let (token_a, token_b) = setup_pair(&service, 1_000_000, 1_000_000).await;
    let Ok(_) = service
        .add_liquidity(token_a, 1_000, token_b, 1_000, alice())
        .await
    else {
        panic!("expected Ok");
    };

    // 100 in at 30 bps: net 99, fee 1, out = floor(1000 * 99 / 1099) = 90.
    let Ok(outcome) = service.swap(token_a, token_b, 100, 0, alice()).await else {
        panic!("expected Ok");
    };
    assert_eq!(outcome.fee, 1);
    assert_eq!(outcome.amount_out, 90);

    let Ok(detail) = service.pool_detail(token_a, token_b).await else {
        panic!("expected Ok");
    };
    let k_after = detail.reserve_a * detail.reserve_b;
    assert!(k_after > 1_000 * 1_000);
    assert_eq!(detail.reserve_a + detail.reserve_b, 1_100 + 910);
}

#[tokio::test]
async fn swap_on_empty_pool_is_rejected() {
    let service = make_service();
    let (token_a, token_b) = setup_pair(&service, 1_000_000, 1_000_000).await;

    assert_eq!(
        service.swap(token_a, token_b, 100, 0, alice()).await,
        Err(DexError::InsufficientLiquidity)
    );
    assert_eq!(
        service.swap(token_a, token_b, 0, 0, alice()).await,
        Err(DexError::ZeroAmount)
    );
}

#[tokio::test]
async fn slippage_floor_aborts_without_side_effects() {
    let service = make_service();
    let (token_a, token_b) = setup_pair(&service, 1_000_000, 1_000_000).await;
    let Ok(_) = service
        .add_liquidity(token_a, 1_000, token_b, 1_000, alice())
        .await
    else {
        panic!("expected Ok");
    };

    let result = service.swap(token_a, token_b, 100, 95, alice()).await;
    assert_eq!(
        result,
        Err(DexError::SlippageExceeded {
            amount_out: 90,
            min_amount_out: 95,
        })
    );

    let Ok(balance) = service.balance_of(token_a, alice()).await else {
        panic!("expected Ok");
    };
    assert_eq!(balance, 999_000);
}

#[tokio::test]
async fn mismatched_follow_on_deposit_is_rejected() {
    let service = make_service();
    let (token_a, token_b) = setup_pair(&service, 1_000_000, 1_000_000).await;
    let Ok(_) = service
        .add_liquidity(token_a, 100_000, token_b, 200_000, alice())
        .await
    else {
        panic!("expected Ok");
    };

    // Pool ratio is 1:2; a 1:1 deposit is far outside the tolerance.
    assert_eq!(
        service
            .add_liquidity(token_a, 10_000, token_b, 10_000, alice())
            .await,
        Err(DexError::RatioMismatch)
    );
}

#[tokio::test]
async fn burning_more_than_owned_is_unauthorized() {
    let service = make_service();
    let (token_a, token_b) = setup_pair(&service, 1_000_000, 1_000_000).await;
    let Ok(added) = service
        .add_liquidity(token_a, 10_000, token_b, 10_000, alice())
        .await
    else {
        panic!("expected Ok");
    };

    let result = service
        .remove_liquidity(token_a, token_b, added.shares_minted + 1, alice())
        .await;
    assert!(matches!(result, Err(DexError::Unauthorized(_))));

    // Bob owns nothing at all.
    let result = service.remove_liquidity(token_a, token_b, 1, bob()).await;
    assert!(matches!(result, Err(DexError::Unauthorized(_))));
}

#[tokio::test]
async fn full_withdrawal_then_reseed_at_new_ratio() {
    let service = make_service();
    let (token_a, token_b) = setup_pair(&service, 1_000_000, 1_000_000).await;
    let Ok(added) = service
        .add_liquidity(token_a, 10_000, token_b, 10_000, alice())
        .await
    else {
        panic!("expected Ok");
    };

    let Ok(removed) = service
        .remove_liquidity(token_a, token_b, added.shares_minted, alice())
        .await
    else {
        panic!("expected Ok");
    };
    assert_eq!(removed.total_shares, 0);
    assert_eq!(removed.reserve_a, 0);
    assert_eq!(removed.reserve_b, 0);

    // Emptied pool accepts any ratio, like a fresh one.
    let Ok(reseeded) = service
        .add_liquidity(token_a, 100, token_b, 40_000, alice())
        .await
    else {
        panic!("expected Ok");
    };
    assert_eq!(reseeded.shares_minted, 2_000); // isqrt(4_000_000)
}

#[tokio::test]
async fn provider_round_trip_never_exceeds_deposit() {
    let service = make_service();
    let (token_a, token_b) = setup_pair(&service, 1_000_000, 1_000_000).await;
    let Ok(_) = service
        .add_liquidity(token_a, 333_333, token_b, 111_111, alice())
        .await
    else {
        panic!("expected Ok");
    };

    // A proportional follow-on deposit, immediately withdrawn.
    let (deposit_a, deposit_b) = (33_333, 11_111);
    let Ok(joined) = service
        .add_liquidity(token_a, deposit_a, token_b, deposit_b, alice())
        .await
    else {
        panic!("expected Ok");
    };
    let Ok(exit) = service
        .remove_liquidity(token_a, token_b, joined.shares_minted, alice())
        .await
    else {
        panic!("expected Ok");
    };
    assert!(exit.amount_a <= deposit_a);
    assert!(exit.amount_b <= deposit_b);
}

#[tokio::test]
async fn trading_accrues_value_to_liquidity_providers() {
    let service = make_service();
    let (token_a, token_b) = setup_pair(&service, 10_000_000, 10_000_000).await;
    let Ok(added) = service
        .add_liquidity(token_a, 1_000_000, token_b, 1_000_000, alice())
        .await
    else {
        panic!("expected Ok");
    };

    // Ping-pong trades leave fees in the pool.
    for _ in 0..10 {
        let Ok(_) = service.swap(token_a, token_b, 50_000, 0, alice()).await else {
            panic!("expected Ok");
        };
        let Ok(_) = service.swap(token_b, token_a, 50_000, 0, alice()).await else {
            panic!("expected Ok");
        };
    }

    let Ok(exit) = service
        .remove_liquidity(token_a, token_b, added.shares_minted, alice())
        .await
    else {
        panic!("expected Ok");
    };
    // The provider withdraws everything; fee accrual means the combined
    // payout exceeds the combined deposit.
    assert!(exit.amount_a + exit.amount_b > 2_000_000);
}

#[tokio::test]
async fn events_stream_in_mutation_order() {
    let service = make_service();
    let (token_a, token_b) = setup_pair(&service, 1_000_000, 1_000_000).await;

    let mut rx = service.event_bus().subscribe();
    let Ok(_) = service
        .add_liquidity(token_a, 1_000, token_b, 1_000, alice())
        .await
    else {
        panic!("expected Ok");
    };
    let Ok(_) = service.swap(token_a, token_b, 100, 0, alice()).await else {
        panic!("expected Ok");
    };
    let Ok(_) = service.remove_liquidity(token_a, token_b, 500, alice()).await else {
        panic!("expected Ok");
    };

    let (Ok(e1), Ok(e2), Ok(e3)) = (rx.recv().await, rx.recv().await, rx.recv().await) else {
        panic!("expected three events");
    };
    assert_eq!(e1.event_type_str(), "liquidity_added");
    assert_eq!(e2.event_type_str(), "swap_executed");
    assert_eq!(e3.event_type_str(), "liquidity_removed");
}
