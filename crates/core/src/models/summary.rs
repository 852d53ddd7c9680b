use serde::{Deserialize, Serialize};

use super::outcome::DataSource;

/// Portfolio aggregates derived from a list of holdings.
/// Never persisted; recomputed on every fetch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Per-holding rows, in the order the holdings were received
    pub holdings: Vec<HoldingView>,

    /// Σ average_price × quantity
    pub total_investment: f64,

    /// Σ last_traded_price × quantity
    pub current_value: f64,

    /// current_value − total_investment
    pub total_pnl: f64,

    /// Σ (close − last_traded_price) × quantity
    pub todays_pnl: f64,

    /// total_pnl / total_investment × 100, or 0 when nothing was invested
    pub pnl_percentage: f64,
}

/// Display row for a single holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingView {
    pub symbol: String,
    pub quantity: u32,
    pub profit_and_loss: f64,
    pub last_traded_price: f64,
    pub average_price: f64,
    pub close: f64,
}

/// A summary together with where its holdings came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioView {
    pub summary: PortfolioSummary,
    pub source: DataSource,
}
