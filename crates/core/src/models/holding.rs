use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// A single stock position, identified by its ticker symbol.
///
/// Records are immutable once constructed: a refresh replaces the whole
/// collection rather than editing individual entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingRecord {
    pub symbol: String,
    pub quantity: u32,
    pub average_price: f64,
    pub last_traded_price: f64,
    /// Previous session's closing price.
    pub close: f64,
}

impl HoldingRecord {
    pub fn new(
        symbol: impl Into<String>,
        quantity: u32,
        average_price: f64,
        last_traded_price: f64,
        close: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            average_price,
            last_traded_price,
            close,
        }
    }

    /// Unrealized P&L of this position: `(ltp - avg) * quantity`.
    pub fn profit_and_loss(&self) -> f64 {
        (self.last_traded_price - self.average_price) * f64::from(self.quantity)
    }

    /// Reject records that cannot be priced: an empty symbol, or any price
    /// that is negative or not finite.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.symbol.trim().is_empty() {
            return Err(CoreError::InvalidHolding("symbol must not be empty".into()));
        }
        let prices = [
            ("avgPrice", self.average_price),
            ("ltp", self.last_traded_price),
            ("close", self.close),
        ];
        for (field, value) in prices {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::InvalidHolding(format!(
                    "{}: {field} must be finite and non-negative, got {value}",
                    self.symbol
                )));
            }
        }
        Ok(())
    }
}

// ── Remote payload ──────────────────────────────────────────────────
//
// { "data": { "userHolding": [ { "avgPrice", "close", "ltp", "quantity", "symbol" } ] } }
//
// `data` and `userHolding` are optional so that a present-but-hollow body can
// be told apart from an explicitly empty holdings list.

#[derive(Debug, Deserialize)]
pub struct HoldingsEnvelope {
    #[serde(default)]
    pub data: Option<HoldingsData>,
}

#[derive(Debug, Deserialize)]
pub struct HoldingsData {
    #[serde(rename = "userHolding", default)]
    pub user_holding: Option<Vec<RemoteHolding>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteHolding {
    #[serde(rename = "avgPrice")]
    pub avg_price: f64,
    pub close: f64,
    pub ltp: f64,
    pub quantity: u32,
    pub symbol: String,
}

impl From<RemoteHolding> for HoldingRecord {
    fn from(r: RemoteHolding) -> Self {
        HoldingRecord {
            symbol: r.symbol,
            quantity: r.quantity,
            average_price: r.avg_price,
            last_traded_price: r.ltp,
            close: r.close,
        }
    }
}

/// Merge `incoming` into `records` keyed by symbol: an existing symbol keeps
/// its position and takes the new values, unknown symbols are appended.
pub fn upsert_by_symbol(records: &mut Vec<HoldingRecord>, incoming: &[HoldingRecord]) {
    for record in incoming {
        match records.iter_mut().find(|r| r.symbol == record.symbol) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
    }
}
