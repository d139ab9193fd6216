//! Trading venue core simulation.
//!
//! Walks the full venue lifecycle: registration, wallet top-ups, buy/sell
//! settlement, milestone rewards, and the leaderboard.

use rust_decimal_macros::dec;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use venue_core::*;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("Trading Venue Core Simulation");
    println!("Wallets, Portfolios, Gem Rewards, Leaderboard\n");

    scenario_1_buy_and_sell().await;
    scenario_2_rejections().await;
    scenario_3_milestones_and_leaderboard().await;

    println!("\nAll simulations completed successfully.");
}

/// One user buying and selling against the seeded catalog.
async fn scenario_1_buy_and_sell() {
    println!("Scenario 1: Buy and Sell Settlement\n");

    let (engine, rx) = TradeEngine::new(VenueConfig::default(), AssetCatalog::seeded());
    let updater = rewards::spawn(rx, engine.store().clone());

    let alice = UserId::new("alice");
    engine.register_user(alice.clone()).await.unwrap();
    engine.top_up(&alice, Money::new(dec!(5000))).await.unwrap();
    println!("  Alice registers and tops up $5,000");

    let result = engine
        .settle(TradeIntent::new(
            alice.clone(),
            Symbol::new("AAPL"),
            Quantity::new(10),
            TradeSide::Buy,
        ))
        .await
        .unwrap();
    println!("  Alice buys 10 AAPL, notional ${}", result.notional);

    let result = engine
        .settle(TradeIntent::new(
            alice.clone(),
            Symbol::new("AAPL"),
            Quantity::new(4),
            TradeSide::Sell,
        ))
        .await
        .unwrap();
    println!("  Alice sells 4 AAPL, notional ${}", result.notional);

    let record = engine.user(&alice).await.unwrap();
    println!(
        "  Wallet ${}, portfolio value ${}, holding {} AAPL\n",
        record.wallet.balance,
        record.portfolio.value,
        record.portfolio.held_quantity(&Symbol::new("AAPL"))
    );

    updater.abort();
}

/// Every rejection leaves the account byte-for-byte unchanged.
async fn scenario_2_rejections() {
    println!("Scenario 2: Rejected Trades\n");

    let (engine, _rx) = TradeEngine::new(VenueConfig::default(), AssetCatalog::seeded());

    let bob = UserId::new("bob");
    engine.register_user(bob.clone()).await.unwrap();
    engine.top_up(&bob, Money::new(dec!(100))).await.unwrap();

    let err = engine
        .settle(TradeIntent::new(
            bob.clone(),
            Symbol::new("TSLA"),
            Quantity::new(1),
            TradeSide::Buy,
        ))
        .await
        .unwrap_err();
    println!("  Buy 1 TSLA on $100: {err}");

    let err = engine
        .settle(TradeIntent::new(
            bob.clone(),
            Symbol::new("AAPL"),
            Quantity::new(1),
            TradeSide::Sell,
        ))
        .await
        .unwrap_err();
    println!("  Sell unheld AAPL: {err}");

    let record = engine.user(&bob).await.unwrap();
    println!(
        "  Wallet still ${}, portfolio still empty: {}\n",
        record.wallet.balance,
        record.portfolio.is_empty()
    );
}

/// Milestone bonuses and the dense leaderboard.
async fn scenario_3_milestones_and_leaderboard() {
    println!("Scenario 3: Milestones and Leaderboard\n");

    let config = VenueConfig {
        starting_balance: Money::new(dec!(100000)),
        ..VenueConfig::default()
    };
    let (engine, rx) = TradeEngine::new(config, AssetCatalog::seeded());
    let updater = rewards::spawn(rx, engine.store().clone());

    let traders = [
        (UserId::new("alice"), 5u32),
        (UserId::new("bob"), 5u32),
        (UserId::new("carol"), 2u32),
    ];

    for (user, trades) in &traders {
        engine.register_user(user.clone()).await.unwrap();
        for _ in 0..*trades {
            engine
                .settle(TradeIntent::new(
                    user.clone(),
                    Symbol::new("NVDA"),
                    Quantity::new(1),
                    TradeSide::Buy,
                ))
                .await
                .unwrap();
        }
    }

    // let the reward updater drain the channel
    tokio::time::sleep(Duration::from_millis(100)).await;

    println!("  Alice and Bob each settle 5 trades (milestone), Carol settles 2\n");
    for entry in engine.rank(10).await {
        println!(
            "  #{} {} gems={} trades={}",
            entry.rank, entry.user_id, entry.gems_count, entry.trade_count
        );
    }

    updater.abort();
}
