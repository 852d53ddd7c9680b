use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::holding::HoldingRecord;

/// Remote source of the user's holdings.
///
/// The HTTP implementation lives in [`super::http`]; tests substitute their
/// own. Every failure mode (transport, status, empty body, bad payload) is an
/// `Err`, and the caller treats them all alike.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait HoldingsSource: Send + Sync {
    /// Human-readable name of this source (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch the full holdings list. `Ok(vec![])` is a valid, empty portfolio.
    async fn fetch_holdings(&self) -> Result<Vec<HoldingRecord>, CoreError>;
}

/// Answers "is the device currently connected?".
///
/// Sampled once per fetch; implementations must be cheap enough to call on
/// every request.
pub trait ConnectivitySignal: Send + Sync {
    fn is_connected(&self) -> bool;
}
