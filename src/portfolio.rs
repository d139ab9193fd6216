// 3.0: portfolio and the position ledger. one holding per symbol, quantity > 0 always.
// 3.1 has the buy/sell ledger functions at the bottom. they work on a copy of the
// portfolio and return the updated value, so the caller decides when state becomes
// visible. nothing here touches the wallet.

use crate::types::{Money, Quantity, Symbol, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// A held position. unit_price is the catalog price snapshotted when the
// holding was first acquired; later buys of the same symbol do not reprice it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: Symbol,
    pub quantity: Quantity,
    pub unit_price: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portfolio {
    pub user_id: UserId,
    pub holdings: HashMap<Symbol, Holding>,
    // running aggregate, adjusted by +/- notional on every trade. can drift
    // from sum(quantity * unit_price) when a symbol is bought at one reference
    // price and later traded at another. known inherited approximation.
    pub value: Money,
    pub created_at: Timestamp,
}

impl Portfolio {
    pub fn new(user_id: UserId, timestamp: Timestamp) -> Self {
        Self {
            user_id,
            holdings: HashMap::new(),
            value: Money::zero(),
            created_at: timestamp,
        }
    }

    pub fn holding(&self, symbol: &Symbol) -> Option<&Holding> {
        self.holdings.get(symbol)
    }

    pub fn held_quantity(&self, symbol: &Symbol) -> Quantity {
        self.holdings
            .get(symbol)
            .map(|h| h.quantity)
            .unwrap_or(Quantity::new(0))
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum LedgerError {
    #[error("no holding of {symbol} in portfolio")]
    NotHeld { symbol: Symbol },

    #[error("insufficient holdings of {symbol}: requested {requested}, held {held}")]
    InsufficientQuantity {
        symbol: Symbol,
        requested: Quantity,
        held: Quantity,
    },
}

// Result of applying one trade leg to a portfolio. The holding reflects the
// post-trade state; a fully sold position is reported with quantity zero even
// though it is no longer in the mapping.
#[derive(Debug, Clone)]
pub struct LedgerOutcome {
    pub portfolio: Portfolio,
    pub holding: Holding,
}

// 3.1: buy leg. first acquisition snapshots the trade's unit price; repeat
// buys only increment quantity. aggregate value grows by the trade notional.
pub fn apply_buy(
    portfolio: &Portfolio,
    symbol: &Symbol,
    quantity: Quantity,
    unit_price: Money,
) -> LedgerOutcome {
    debug_assert!(!quantity.is_zero(), "buy quantity must be positive");

    let mut updated = portfolio.clone();

    let holding = match updated.holdings.get(symbol) {
        Some(held) => Holding {
            symbol: held.symbol.clone(),
            quantity: held.quantity.add(quantity),
            unit_price: held.unit_price,
        },
        None => Holding {
            symbol: symbol.clone(),
            quantity,
            unit_price,
        },
    };

    updated.holdings.insert(symbol.clone(), holding.clone());
    updated.value = updated.value.add(unit_price.times(quantity));

    LedgerOutcome {
        portfolio: updated,
        holding,
    }
}

// 3.2: sell leg. rejects before mutation if the symbol is not held or held
// quantity is short. a holding that reaches zero is removed from the mapping,
// never retained. aggregate value shrinks by the trade notional, priced at the
// trade's unit price rather than the holding's acquisition price.
pub fn apply_sell(
    portfolio: &Portfolio,
    symbol: &Symbol,
    quantity: Quantity,
    unit_price: Money,
) -> Result<LedgerOutcome, LedgerError> {
    debug_assert!(!quantity.is_zero(), "sell quantity must be positive");

    let held = portfolio
        .holdings
        .get(symbol)
        .ok_or_else(|| LedgerError::NotHeld {
            symbol: symbol.clone(),
        })?;

    if held.quantity < quantity {
        return Err(LedgerError::InsufficientQuantity {
            symbol: symbol.clone(),
            requested: quantity,
            held: held.quantity,
        });
    }

    let mut updated = portfolio.clone();
    let remaining = held.quantity.sub(quantity);

    let holding = Holding {
        symbol: held.symbol.clone(),
        quantity: remaining,
        unit_price: held.unit_price,
    };

    if remaining.is_zero() {
        updated.holdings.remove(symbol);
    } else {
        updated.holdings.insert(symbol.clone(), holding.clone());
    }

    updated.value = updated.value.sub(unit_price.times(quantity));

    Ok(LedgerOutcome {
        portfolio: updated,
        holding,
    })
}
