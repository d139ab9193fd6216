//! End-to-end settlement scenarios.
//!
//! These tests drive the engine the way the surrounding service layer would:
//! register, fund, trade, and read back state, with the reward updater running
//! as a real consumer task.

use rust_decimal_macros::dec;
use std::time::Duration;
use venue_core::*;

fn test_catalog() -> AssetCatalog {
    AssetCatalog::new([
        AssetRef::new("AAPL", "Apple Inc.", Money::new(dec!(50))),
        AssetRef::new("TSLA", "Tesla Inc.", Money::new(dec!(700))),
    ])
}

async fn engine_with_user(
    id: &str,
    balance: rust_decimal::Decimal,
) -> (TradeEngine, NotificationReceiver) {
    let (engine, rx) = TradeEngine::new(VenueConfig::default(), test_catalog());
    engine.register_user(UserId::new(id)).await.unwrap();
    engine
        .top_up(&UserId::new(id), Money::new(balance))
        .await
        .unwrap();
    (engine, rx)
}

fn intent(user: &str, symbol: &str, qty: u32, side: TradeSide) -> TradeIntent {
    TradeIntent::new(
        UserId::new(user),
        Symbol::new(symbol),
        Quantity::new(qty),
        side,
    )
}

async fn wait_for_trades(engine: &TradeEngine, user: &UserId, expected: u32) {
    for _ in 0..200 {
        if let Some(record) = engine.user(user).await {
            if record.account.trade_count >= expected {
                return;
            }
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("reward updater never reached {expected} trades for {user}");
}

#[tokio::test]
async fn buy_scenario_moves_value_and_notifies() {
    // U1: wallet 1000, empty portfolio, buys 10 units priced 50
    let (engine, mut rx) = engine_with_user("U1", dec!(1000)).await;

    let result = engine
        .settle(intent("U1", "AAPL", 10, TradeSide::Buy))
        .await
        .unwrap();

    assert_eq!(result.user_id, UserId::new("U1"));
    assert_eq!(result.notional.value(), dec!(500));

    let record = engine.user(&UserId::new("U1")).await.unwrap();
    assert_eq!(record.wallet.balance.value(), dec!(500));

    let holding = record.portfolio.holding(&Symbol::new("AAPL")).unwrap();
    assert_eq!(holding.quantity.value(), 10);
    assert_eq!(holding.unit_price.value(), dec!(50));

    let notice = rx.recv().await.unwrap();
    assert_eq!(notice.user_id, UserId::new("U1"));
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn oversell_scenario_rejected_without_mutation() {
    // U2: holds 10 units priced 50, sells 15
    let (engine, mut rx) = engine_with_user("U2", dec!(1000)).await;
    engine
        .settle(intent("U2", "AAPL", 10, TradeSide::Buy))
        .await
        .unwrap();
    let _ = rx.recv().await;
    let before = engine.user(&UserId::new("U2")).await.unwrap();

    let err = engine
        .settle(intent("U2", "AAPL", 15, TradeSide::Sell))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientHoldings);

    let after = engine.user(&UserId::new("U2")).await.unwrap();
    assert_eq!(after.wallet, before.wallet);
    assert_eq!(after.portfolio, before.portfolio);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn milestone_bonus_on_fifth_trade() {
    // an account at tradeCount=4, gemsCount=10 completes one more trade
    let (engine, rx) = engine_with_user("U3", dec!(10000)).await;

    {
        let entry = engine.store().entry(&UserId::new("U3")).await.unwrap();
        let mut record = entry.lock().await;
        record.account.trade_count = 4;
        record.account.gems_count = 10;
    }

    let updater = rewards::spawn(rx, engine.store().clone());
    engine
        .settle(intent("U3", "AAPL", 1, TradeSide::Buy))
        .await
        .unwrap();
    wait_for_trades(&engine, &UserId::new("U3"), 5).await;

    let record = engine.user(&UserId::new("U3")).await.unwrap();
    assert_eq!(record.account.trade_count, 5);
    assert_eq!(record.account.gems_count, 16); // 10 + 1 base + 5 bonus
    updater.abort();
}

#[tokio::test]
async fn rewards_arrive_in_settlement_order() {
    let (engine, rx) = engine_with_user("U4", dec!(100000)).await;
    let updater = rewards::spawn(rx, engine.store().clone());

    for _ in 0..10 {
        engine
            .settle(intent("U4", "AAPL", 1, TradeSide::Buy))
            .await
            .unwrap();
    }
    wait_for_trades(&engine, &UserId::new("U4"), 10).await;

    let record = engine.user(&UserId::new("U4")).await.unwrap();
    // 10 base gems + 5 at trade five + 10 at trade ten
    assert_eq!(record.account.gems_count, 25);
    updater.abort();
}

#[tokio::test]
async fn concurrent_same_user_settlements_never_overdraw() {
    // 10 concurrent buys of 1 @ 50 against a 250 balance: exactly 5 settle
    let (engine, _rx) = engine_with_user("U5", dec!(250)).await;
    let engine = std::sync::Arc::new(engine);

    let mut handles = Vec::new();
    for _ in 0..10 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine.settle(intent("U5", "AAPL", 1, TradeSide::Buy)).await
        }));
    }

    let mut settled = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => settled += 1,
            Err(err) => {
                assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
                rejected += 1;
            }
        }
    }

    assert_eq!(settled, 5);
    assert_eq!(rejected, 5);

    let record = engine.user(&UserId::new("U5")).await.unwrap();
    assert_eq!(record.wallet.balance.value(), dec!(0));
    assert!(!record.wallet.balance.is_negative());
    assert_eq!(
        record.portfolio.held_quantity(&Symbol::new("AAPL")).value(),
        5
    );
}

#[tokio::test]
async fn concurrent_different_users_do_not_interfere() {
    let (engine, _rx) = TradeEngine::new(VenueConfig::default(), test_catalog());
    let engine = std::sync::Arc::new(engine);

    for id in ["a", "b", "c", "d"] {
        engine.register_user(UserId::new(id)).await.unwrap();
        engine
            .top_up(&UserId::new(id), Money::new(dec!(500)))
            .await
            .unwrap();
    }

    let mut handles = Vec::new();
    for id in ["a", "b", "c", "d"] {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..10 {
                engine
                    .settle(intent(id, "AAPL", 1, TradeSide::Buy))
                    .await
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    for id in ["a", "b", "c", "d"] {
        let record = engine.user(&UserId::new(id)).await.unwrap();
        assert_eq!(record.wallet.balance.value(), dec!(0));
        assert_eq!(
            record.portfolio.held_quantity(&Symbol::new("AAPL")).value(),
            10
        );
    }
}

#[tokio::test]
async fn lock_acquisition_timeout_surfaces() {
    let (engine, _rx) = engine_with_user("U6", dec!(1000)).await;

    // hold the account lock so the settlement cannot acquire it
    let entry = engine.store().entry(&UserId::new("U6")).await.unwrap();
    let guard = entry.lock().await;

    let err = engine
        .settle_with_timeout(
            intent("U6", "AAPL", 1, TradeSide::Buy),
            Some(Duration::from_millis(20)),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LockTimeout);
    drop(guard);

    // lock released, same intent settles
    engine
        .settle_with_timeout(
            intent("U6", "AAPL", 1, TradeSide::Buy),
            Some(Duration::from_millis(20)),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn rank_is_idempotent_without_mutation() {
    let (engine, rx) = engine_with_user("U7", dec!(10000)).await;
    let updater = rewards::spawn(rx, engine.store().clone());

    engine.register_user(UserId::new("U8")).await.unwrap();
    for _ in 0..3 {
        engine
            .settle(intent("U7", "AAPL", 1, TradeSide::Buy))
            .await
            .unwrap();
    }
    wait_for_trades(&engine, &UserId::new("U7"), 3).await;

    let first = engine.rank(10).await;
    let second = engine.rank(10).await;
    assert_eq!(first, second);
    assert_eq!(first[0].user_id, UserId::new("U7"));
    assert_eq!(first[0].gems_count, 3);
    updater.abort();
}

#[tokio::test]
async fn settlement_result_serializes_for_the_api_layer() {
    let (engine, _rx) = engine_with_user("U9", dec!(1000)).await;
    let result = engine
        .settle(intent("U9", "AAPL", 2, TradeSide::Buy))
        .await
        .unwrap();

    let json = serde_json::to_string(&result).unwrap();
    let back: SettlementResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back, result);
}
