//! Cash wallet management.
//!
//! Each account owns exactly one wallet. The balance can never be driven
//! negative by a trade: a debit that would overdraw is rejected before any
//! mutation. Top-ups are the one exception, kept sign-unconstrained to match
//! the venue's existing behavior.

use crate::types::{Money, Timestamp, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub user_id: UserId,
    pub balance: Money,
    pub created_at: Timestamp,
}

impl Wallet {
    pub fn new(user_id: UserId, timestamp: Timestamp) -> Self {
        Self {
            user_id,
            balance: Money::zero(),
            created_at: timestamp,
        }
    }

    pub fn with_balance(user_id: UserId, balance: Money, timestamp: Timestamp) -> Self {
        Self {
            user_id,
            balance,
            created_at: timestamp,
        }
    }

    pub fn credit(&mut self, amount: Money) {
        self.balance = self.balance.add(amount);
    }

    pub fn debit(&mut self, amount: Money) -> Result<(), WalletError> {
        if amount > self.balance {
            return Err(WalletError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }
        self.balance = self.balance.sub(amount);
        Ok(())
    }

    pub fn can_cover(&self, amount: Money) -> bool {
        self.balance >= amount
    }

    // amount may carry any sign and is applied without a floor check
    pub fn top_up(&mut self, amount: Money) {
        self.balance = self.balance.add(amount);
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum WalletError {
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: Money, available: Money },
}
