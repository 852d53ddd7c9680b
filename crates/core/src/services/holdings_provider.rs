use log::{debug, info, warn};
use std::sync::Arc;

use crate::errors::CoreError;
use crate::models::holding::HoldingRecord;
use crate::models::outcome::{FallbackReason, HoldingsOutcome};
use crate::providers::traits::{ConnectivitySignal, HoldingsSource};
use crate::storage::traits::HoldingsCache;

/// Decides between the remote source and the local cache.
///
/// Strategy:
/// - **Online**: fetch from the source. On success, replace the cache with
///   the fresh set (even when it is empty) and return it.
/// - **Online, fetch failed**: any error falls back to the cache.
/// - **Offline**: go straight to the cache; the source is not called.
///
/// The fallback path only reads the cache. If it is empty the request ends
/// in [`HoldingsOutcome::Unavailable`].
pub struct HoldingsProvider {
    source: Arc<dyn HoldingsSource>,
    cache: Arc<dyn HoldingsCache>,
    connectivity: Arc<dyn ConnectivitySignal>,
}

impl HoldingsProvider {
    pub fn new(
        source: Arc<dyn HoldingsSource>,
        cache: Arc<dyn HoldingsCache>,
        connectivity: Arc<dyn ConnectivitySignal>,
    ) -> Self {
        Self {
            source,
            cache,
            connectivity,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connectivity.is_connected()
    }

    /// Run one fetch-or-cache decision.
    ///
    /// `Err` is reserved for failures of the cache itself on the fallback
    /// path; everything else is expressed through [`HoldingsOutcome`].
    pub async fn load(&self) -> Result<HoldingsOutcome, CoreError> {
        let reason = if self.connectivity.is_connected() {
            match self.source.fetch_holdings().await {
                Ok(holdings) => {
                    self.store(&holdings).await;
                    return Ok(HoldingsOutcome::Fresh(holdings));
                }
                Err(e) => {
                    warn!(
                        "{} source failed, falling back to cache: {e}",
                        self.source.name()
                    );
                    FallbackReason::RemoteFailed(e.to_string())
                }
            }
        } else {
            debug!("Offline, reading holdings from cache");
            FallbackReason::Offline
        };

        self.fallback(reason).await
    }

    /// Fetch holdings, surfacing an exhausted fallback as
    /// [`CoreError::NoDataAvailable`].
    pub async fn fetch_holdings(&self) -> Result<Vec<HoldingRecord>, CoreError> {
        match self.load().await? {
            HoldingsOutcome::Fresh(holdings) | HoldingsOutcome::Cached { holdings, .. } => {
                Ok(holdings)
            }
            HoldingsOutcome::Unavailable(reason) => Err(CoreError::NoDataAvailable(reason)),
        }
    }

    async fn store(&self, holdings: &[HoldingRecord]) {
        match self.cache.replace_all(holdings).await {
            Ok(()) => info!("Cached {} fresh holdings", holdings.len()),
            // The fetched data is still good; the next offline read sees the older set.
            Err(e) => warn!("Failed to write holdings cache: {e}"),
        }
    }

    async fn fallback(&self, reason: FallbackReason) -> Result<HoldingsOutcome, CoreError> {
        let holdings = self.cache.read_all().await?;
        if holdings.is_empty() {
            warn!("No cached holdings available ({reason:?})");
            return Ok(HoldingsOutcome::Unavailable(reason));
        }

        let saved_at = self.cache.last_updated().await.unwrap_or_else(|e| {
            debug!("Could not read cache timestamp: {e}");
            None
        });
        debug!("Serving {} cached holdings", holdings.len());
        Ok(HoldingsOutcome::Cached {
            holdings,
            reason,
            saved_at,
        })
    }
}
