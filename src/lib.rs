// venue-core: gamified trading venue core.
// settlement-first architecture: account consistency and reward ordering take priority.
// state is process-lifetime only; no persistence, no order book, no real money.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: UserId, Symbol, Money, Quantity, TradeSide
//   2.x  catalog.rs: asset reference data, seeded universe
//   3.x  portfolio.rs: position ledger: buy/sell legs on working copies
//   4.x  account.rs: reward counters, milestone bonuses
//   5.x  store.rs: per-user records with per-key locking
//   6.x  events.rs: settlement notifications over a bounded channel
//   7.x  rewards.rs: async reward counter updater
//   8.x  leaderboard.rs: dense tie-aware ranking
//   9.x  config.rs: venue settings
//   10.x engine.rs: trade settlement engine, top-up, ranking surface
//   wallet.rs: cash wallet, non-negative balance discipline

// domain modules
pub mod account;
pub mod catalog;
pub mod portfolio;
pub mod types;
pub mod wallet;

// state and coordination modules
pub mod config;
pub mod engine;
pub mod events;
pub mod leaderboard;
pub mod rewards;
pub mod store;

// re exports for convenience
pub use account::*;
pub use catalog::*;
pub use config::*;
pub use engine::*;
pub use events::*;
pub use leaderboard::*;
pub use portfolio::*;
pub use store::*;
pub use types::*;
pub use wallet::*;
