//! Account identity and reward counters.
//!
//! An account is created once per user and carries the gamification state:
//! a monotonic trade count and a monotonic gems count. Milestone bonuses are
//! one-shot, awarded when the trade count lands on exactly 5 or exactly 10,
//! and never repeat beyond that.

use crate::types::{Timestamp, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub user_id: UserId,
    pub trade_count: u32,
    pub gems_count: u64,
    pub created_at: Timestamp,
}

// What a single settled trade awarded: the base gem plus any milestone bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GemAward {
    pub base: u64,
    pub bonus: u64,
}

impl GemAward {
    pub fn total(&self) -> u64 {
        self.base + self.bonus
    }
}

impl Account {
    pub fn new(user_id: UserId, timestamp: Timestamp) -> Self {
        Self {
            user_id,
            trade_count: 0,
            gems_count: 0,
            created_at: timestamp,
        }
    }

    // 4.1: one settled trade. +1 trade, +1 gem, and the one-shot milestone
    // bonus evaluated against the incremented count.
    pub fn record_settled_trade(&mut self) -> GemAward {
        self.trade_count += 1;
        self.gems_count += 1;

        let bonus = match self.trade_count {
            5 => 5,
            10 => 10,
            _ => 0,
        };
        self.gems_count += bonus;

        GemAward { base: 1, bonus }
    }
}
