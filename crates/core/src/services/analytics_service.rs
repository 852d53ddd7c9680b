use crate::models::holding::HoldingRecord;
use crate::models::summary::{HoldingView, PortfolioSummary};

/// Compute the portfolio summary for a list of holdings.
///
/// Pure and infallible. Sums run left to right over the input starting from
/// `0.0`, so the same list always yields bit-identical totals. An empty list
/// yields an all-zero summary.
///
/// - `total_investment = Σ avg × qty`
/// - `current_value    = Σ ltp × qty`
/// - `total_pnl        = current_value − total_investment`
/// - `todays_pnl       = Σ (close − ltp) × qty`
/// - `pnl_percentage   = total_pnl / total_investment × 100`, or 0 when
///   `total_investment <= 0`
pub fn summarize(holdings: &[HoldingRecord]) -> PortfolioSummary {
    let views: Vec<HoldingView> = holdings.iter().map(to_view).collect();

    let total_investment = holdings
        .iter()
        .fold(0.0, |acc, h| acc + h.average_price * f64::from(h.quantity));
    let current_value = holdings
        .iter()
        .fold(0.0, |acc, h| acc + h.last_traded_price * f64::from(h.quantity));
    let total_pnl = current_value - total_investment;
    let todays_pnl = holdings.iter().fold(0.0, |acc, h| {
        acc + (h.close - h.last_traded_price) * f64::from(h.quantity)
    });
    let pnl_percentage = if total_investment > 0.0 {
        (total_pnl / total_investment) * 100.0
    } else {
        0.0
    };

    PortfolioSummary {
        holdings: views,
        total_investment,
        current_value,
        total_pnl,
        todays_pnl,
        pnl_percentage,
    }
}

fn to_view(holding: &HoldingRecord) -> HoldingView {
    HoldingView {
        symbol: holding.symbol.clone(),
        quantity: holding.quantity,
        profit_and_loss: holding.profit_and_loss(),
        last_traded_price: holding.last_traded_price,
        average_price: holding.average_price,
        close: holding.close,
    }
}
