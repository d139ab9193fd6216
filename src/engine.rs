// 10.0 engine.rs: trade settlement engine. validates an intent, prices it at
// the catalog reference price, applies the ledger and wallet legs on working
// copies, and commits both under the per-account lock as one step. a failure
// anywhere before the commit leaves wallet and portfolio untouched.
//
// lock discipline: the account lock is taken before resolution and held
// through the commit. the notification publish happens after the lock drops.

use crate::catalog::AssetCatalog;
use crate::config::VenueConfig;
use crate::events::{notification_channel, NotificationReceiver, NotificationSender, TradeSettledNotice};
use crate::leaderboard::{self, RankEntry};
use crate::portfolio::{self, LedgerError};
use crate::store::{AccountStore, StoreError, UserRecord};
use crate::types::{Money, Quantity, Symbol, Timestamp, TradeSide, UserId};
use crate::wallet::{Wallet, WalletError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

// Transient value object for one settlement call. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeIntent {
    pub user_id: UserId,
    pub symbol: Symbol,
    pub quantity: Quantity,
    pub side: TradeSide,
}

impl TradeIntent {
    pub fn new(user_id: UserId, symbol: Symbol, quantity: Quantity, side: TradeSide) -> Self {
        Self {
            user_id,
            symbol,
            quantity,
            side,
        }
    }

    fn validate(&self) -> Result<(), EngineError> {
        if self.user_id.is_empty() {
            return Err(EngineError::InvalidRequest("user id is empty".to_string()));
        }
        if self.symbol.is_empty() {
            return Err(EngineError::InvalidRequest("symbol is empty".to_string()));
        }
        if self.quantity.is_zero() {
            return Err(EngineError::InvalidRequest(
                "quantity must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementResult {
    pub user_id: UserId,
    pub symbol: Symbol,
    pub quantity: Quantity,
    pub notional: Money,
    pub settled_at: Timestamp,
}

// Error taxonomy surfaced to the outer layer. Kinds map one-to-one onto the
// venue's API error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    AccountNotFound,
    AssetNotFound,
    InsufficientFunds,
    InsufficientHoldings,
    InvalidRequest,
    UserExists,
    LockTimeout,
    Internal,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    #[error("account not found for user {0}")]
    AccountNotFound(UserId),

    #[error("asset not found: {0}")]
    AssetNotFound(Symbol),

    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: Money, available: Money },

    #[error(transparent)]
    InsufficientHoldings(#[from] LedgerError),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("account already exists for user {0}")]
    UserExists(UserId),

    #[error("timed out acquiring account lock for user {0}")]
    LockTimeout(UserId),

    #[error("internal error: {0}")]
    Internal(String),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::AccountNotFound(_) => ErrorKind::AccountNotFound,
            EngineError::AssetNotFound(_) => ErrorKind::AssetNotFound,
            EngineError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            EngineError::InsufficientHoldings(_) => ErrorKind::InsufficientHoldings,
            EngineError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            EngineError::UserExists(_) => ErrorKind::UserExists,
            EngineError::LockTimeout(_) => ErrorKind::LockTimeout,
            EngineError::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<WalletError> for EngineError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::InsufficientFunds {
                requested,
                available,
            } => EngineError::InsufficientFunds {
                requested,
                available,
            },
        }
    }
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(user) => EngineError::AccountNotFound(user),
            StoreError::AlreadyExists(user) => EngineError::UserExists(user),
        }
    }
}

/** 10.1: the engine. holds the store, the catalog, and the notification bus */
#[derive(Debug)]
pub struct TradeEngine {
    store: Arc<AccountStore>,
    catalog: Arc<AssetCatalog>,
    notifier: NotificationSender,
    config: VenueConfig,
}

impl TradeEngine {
    // The returned receiver feeds the reward updater; hand it to
    // `rewards::spawn` together with a clone of `store()`.
    pub fn new(config: VenueConfig, catalog: AssetCatalog) -> (Self, NotificationReceiver) {
        let (notifier, rx) = notification_channel(config.notification_capacity);
        let engine = Self {
            store: Arc::new(AccountStore::new()),
            catalog: Arc::new(catalog),
            notifier,
            config,
        };
        (engine, rx)
    }

    pub fn store(&self) -> &Arc<AccountStore> {
        &self.store
    }

    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    // 10.2: registration. account, wallet, and portfolio come into existence
    // together, at most once per identity.
    pub async fn register_user(&self, user_id: UserId) -> Result<UserRecord, EngineError> {
        if user_id.is_empty() {
            return Err(EngineError::InvalidRequest("user id is empty".to_string()));
        }

        self.store.create(user_id.clone(), Timestamp::now()).await?;

        if self.config.starting_balance != Money::zero() {
            if let Some(entry) = self.store.entry(&user_id).await {
                let mut record = entry.lock().await;
                record.wallet.credit(self.config.starting_balance);
            }
        }

        info!(user = %user_id, "user registered");
        self.store
            .get(&user_id)
            .await
            .ok_or_else(|| EngineError::Internal("record vanished after create".to_string()))
    }

    pub async fn settle(&self, intent: TradeIntent) -> Result<SettlementResult, EngineError> {
        self.settle_with_timeout(intent, self.config.lock_timeout)
            .await
    }

    // 10.3: the settlement algorithm. not cancellable once the account lock
    // is held; the timeout bounds only the wait to acquire it.
    pub async fn settle_with_timeout(
        &self,
        intent: TradeIntent,
        lock_timeout: Option<Duration>,
    ) -> Result<SettlementResult, EngineError> {
        intent.validate()?;

        let entry = self
            .store
            .entry(&intent.user_id)
            .await
            .ok_or_else(|| EngineError::AccountNotFound(intent.user_id.clone()))?;

        let mut record = match lock_timeout {
            Some(limit) => tokio::time::timeout(limit, entry.lock())
                .await
                .map_err(|_| EngineError::LockTimeout(intent.user_id.clone()))?,
            None => entry.lock().await,
        };

        let asset = self
            .catalog
            .find_by_symbol(&intent.symbol)
            .ok_or_else(|| EngineError::AssetNotFound(intent.symbol.clone()))?;

        let unit_price = asset.reference_price;
        let notional = unit_price.times(intent.quantity);

        // both legs run on working copies; nothing visible until the commit
        let mut wallet = record.wallet.clone();
        let outcome = match intent.side {
            TradeSide::Buy => {
                if !wallet.can_cover(notional) {
                    warn!(
                        user = %intent.user_id,
                        symbol = %intent.symbol,
                        notional = %notional,
                        balance = %wallet.balance,
                        "buy rejected: insufficient funds"
                    );
                    return Err(EngineError::InsufficientFunds {
                        requested: notional,
                        available: wallet.balance,
                    });
                }
                let outcome =
                    portfolio::apply_buy(&record.portfolio, &intent.symbol, intent.quantity, unit_price);
                wallet.debit(notional)?;
                outcome
            }
            TradeSide::Sell => {
                let outcome =
                    portfolio::apply_sell(&record.portfolio, &intent.symbol, intent.quantity, unit_price)
                        .map_err(|err| {
                            warn!(
                                user = %intent.user_id,
                                symbol = %intent.symbol,
                                "sell rejected: {err}"
                            );
                            err
                        })?;
                wallet.credit(notional);
                outcome
            }
        };

        // single commit point for both records
        record.wallet = wallet;
        record.portfolio = outcome.portfolio;
        drop(record);

        let settled_at = Timestamp::now();
        self.notifier
            .publish(TradeSettledNotice::new(intent.user_id.clone(), settled_at))
            .await;

        info!(
            user = %intent.user_id,
            symbol = %intent.symbol,
            side = %intent.side,
            quantity = %intent.quantity,
            notional = %notional,
            "trade settled"
        );

        Ok(SettlementResult {
            user_id: intent.user_id,
            symbol: intent.symbol,
            quantity: intent.quantity,
            notional,
            settled_at,
        })
    }

    // 10.4: wallet top-up. amount keeps its sign; no floor check.
    pub async fn top_up(&self, user_id: &UserId, amount: Money) -> Result<Wallet, EngineError> {
        let entry = self
            .store
            .entry(user_id)
            .await
            .ok_or_else(|| EngineError::AccountNotFound(user_id.clone()))?;

        let mut record = entry.lock().await;
        record.wallet.top_up(amount);
        let wallet = record.wallet.clone();
        drop(record);

        info!(user = %user_id, amount = %amount, balance = %wallet.balance, "wallet topped up");
        Ok(wallet)
    }

    // 10.5: dense leaderboard over a point-in-time account snapshot.
    pub async fn rank(&self, limit: usize) -> Vec<RankEntry> {
        let accounts = self.store.snapshot_accounts().await;
        leaderboard::rank(&accounts, limit)
    }

    pub async fn user(&self, user_id: &UserId) -> Option<UserRecord> {
        self.store.get(user_id).await
    }
}
