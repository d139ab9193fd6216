// 5.0: account store. one record per user holding account + wallet + portfolio,
// each behind its own mutex so same-user settlements serialize and different
// users never contend. the outer map lock is held only for lookups, never
// across a record mutation.

use crate::account::Account;
use crate::portfolio::Portfolio;
use crate::types::{Timestamp, UserId};
use crate::wallet::Wallet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

// Everything the venue knows about one user. Wallet and portfolio mutate
// together under the record lock; multi-field updates need coarser locking
// than a concurrent map can give.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub account: Account,
    pub wallet: Wallet,
    pub portfolio: Portfolio,
}

impl UserRecord {
    pub fn new(user_id: UserId, timestamp: Timestamp) -> Self {
        Self {
            account: Account::new(user_id.clone(), timestamp),
            wallet: Wallet::new(user_id.clone(), timestamp),
            portfolio: Portfolio::new(user_id, timestamp),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("no account for user {0}")]
    NotFound(UserId),

    #[error("account already exists for user {0}")]
    AlreadyExists(UserId),
}

#[derive(Debug, Default)]
pub struct AccountStore {
    records: RwLock<HashMap<UserId, Arc<Mutex<UserRecord>>>>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    // 5.1: at most one record per identity.
    pub async fn create(&self, user_id: UserId, timestamp: Timestamp) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        if records.contains_key(&user_id) {
            return Err(StoreError::AlreadyExists(user_id));
        }
        let record = UserRecord::new(user_id.clone(), timestamp);
        records.insert(user_id, Arc::new(Mutex::new(record)));
        Ok(())
    }

    // Handle to a user's record lock. Callers hold the returned mutex for the
    // whole read-modify-write sequence of a settlement.
    pub async fn entry(&self, user_id: &UserId) -> Option<Arc<Mutex<UserRecord>>> {
        self.records.read().await.get(user_id).cloned()
    }

    pub async fn contains(&self, user_id: &UserId) -> bool {
        self.records.read().await.contains_key(user_id)
    }

    // Point-in-time copy of one record. Explicit None for unknown users,
    // never a default-constructed value.
    pub async fn get(&self, user_id: &UserId) -> Option<UserRecord> {
        let entry = self.entry(user_id).await?;
        let record = entry.lock().await;
        Some(record.clone())
    }

    pub async fn upsert_wallet(&self, wallet: Wallet) -> Result<(), StoreError> {
        let entry = self
            .entry(&wallet.user_id)
            .await
            .ok_or_else(|| StoreError::NotFound(wallet.user_id.clone()))?;
        let mut record = entry.lock().await;
        record.wallet = wallet;
        Ok(())
    }

    pub async fn upsert_portfolio(&self, portfolio: Portfolio) -> Result<(), StoreError> {
        let entry = self
            .entry(&portfolio.user_id)
            .await
            .ok_or_else(|| StoreError::NotFound(portfolio.user_id.clone()))?;
        let mut record = entry.lock().await;
        record.portfolio = portfolio;
        Ok(())
    }

    // 5.2: reward-counter snapshot for ranking. each record is locked just
    // long enough to copy its account, so the scan is not linearizable with
    // respect to concurrent settlements. accepted by design.
    pub async fn snapshot_accounts(&self) -> Vec<Account> {
        let entries: Vec<Arc<Mutex<UserRecord>>> =
            self.records.read().await.values().cloned().collect();

        let mut accounts = Vec::with_capacity(entries.len());
        for entry in entries {
            let record = entry.lock().await;
            accounts.push(record.account.clone());
        }
        accounts
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}
