// 2.0: asset catalog. read-mostly reference data used to price new positions.
// seeded once at startup, never mutated by the settlement path.

use crate::types::{Money, Symbol};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// Reference entry for a tradeable asset. The reference price is the price
// every trade settles at; there is no live market feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    pub symbol: Symbol,
    pub name: String,
    pub reference_price: Money,
}

impl AssetRef {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>, price: Money) -> Self {
        Self {
            symbol: Symbol::new(symbol),
            name: name.into(),
            reference_price: price,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    assets: HashMap<Symbol, AssetRef>,
}

impl AssetCatalog {
    pub fn new(assets: impl IntoIterator<Item = AssetRef>) -> Self {
        Self {
            assets: assets
                .into_iter()
                .map(|a| (a.symbol.clone(), a))
                .collect(),
        }
    }

    // 2.1: the default reference universe. ten large caps.
    pub fn seeded() -> Self {
        Self::new([
            AssetRef::new("AAPL", "Apple Inc.", Money::new(dec!(150.00))),
            AssetRef::new("GOOGL", "Alphabet Inc.", Money::new(dec!(2800.00))),
            AssetRef::new("AMZN", "Amazon.com Inc.", Money::new(dec!(3400.00))),
            AssetRef::new("MSFT", "Microsoft Corp.", Money::new(dec!(299.00))),
            AssetRef::new("TSLA", "Tesla Inc.", Money::new(dec!(700.00))),
            AssetRef::new("FB", "Facebook Inc.", Money::new(dec!(350.00))),
            AssetRef::new("NFLX", "Netflix Inc.", Money::new(dec!(590.00))),
            AssetRef::new("NVDA", "NVIDIA Corp.", Money::new(dec!(220.00))),
            AssetRef::new("BABA", "Alibaba Group", Money::new(dec!(160.00))),
            AssetRef::new("V", "Visa Inc.", Money::new(dec!(230.00))),
        ])
    }

    pub fn find_by_symbol(&self, symbol: &Symbol) -> Option<&AssetRef> {
        self.assets.get(symbol)
    }

    // snapshot of the full universe at call time
    pub fn list_all(&self) -> Vec<AssetRef> {
        let mut all: Vec<AssetRef> = self.assets.values().cloned().collect();
        all.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        all
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}
