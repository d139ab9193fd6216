// 9.0 config.rs: venue settings in one place.

use crate::types::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueConfig {
    // Buffered capacity of the settlement notification channel
    pub notification_capacity: usize,
    // How long a settlement waits to acquire the per-account lock before
    // giving up. None waits indefinitely.
    pub lock_timeout: Option<Duration>,
    // Balance granted to newly registered users
    pub starting_balance: Money,
}

impl Default for VenueConfig {
    fn default() -> Self {
        Self {
            notification_capacity: 1024,
            lock_timeout: None,
            starting_balance: Money::new(Decimal::ZERO),
        }
    }
}
