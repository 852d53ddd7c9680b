pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use std::sync::Arc;

use models::{
    holding::HoldingRecord,
    outcome::{DataSource, HoldingsOutcome},
    summary::{PortfolioSummary, PortfolioView},
};
use providers::traits::{ConnectivitySignal, HoldingsSource};
use services::{analytics_service, holdings_provider::HoldingsProvider};
use storage::traits::HoldingsCache;

use errors::CoreError;

/// Main entry point for the Holdings Tracker core library.
/// Owns the fetch-or-cache provider and remembers the last rendered view.
#[must_use]
pub struct HoldingsTracker {
    provider: HoldingsProvider,
    last_view: Option<PortfolioView>,
}

impl std::fmt::Debug for HoldingsTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HoldingsTracker")
            .field(
                "last_holdings",
                &self.last_view.as_ref().map(|v| v.summary.holdings.len()),
            )
            .field("last_source", &self.last_view.as_ref().map(|v| &v.source))
            .finish()
    }
}

impl HoldingsTracker {
    /// Build a tracker from explicit collaborators.
    pub fn new(
        source: Arc<dyn HoldingsSource>,
        cache: Arc<dyn HoldingsCache>,
        connectivity: Arc<dyn ConnectivitySignal>,
    ) -> Self {
        Self {
            provider: HoldingsProvider::new(source, cache, connectivity),
            last_view: None,
        }
    }

    /// Wire the default collaborators described by `settings`:
    /// HTTP source, file cache (or in-memory when no path is set), and a TCP
    /// probe (or an always-online flag when no probe is set).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_settings(settings: &models::settings::Settings) -> Result<Self, CoreError> {
        use crate::providers::connectivity::{ManualConnectivity, TcpProbeConnectivity};
        use crate::providers::http::HttpHoldingsSource;
        use crate::storage::{file_cache::FileHoldingsCache, memory::InMemoryHoldingsCache};

        settings.validate()?;

        let source: Arc<dyn HoldingsSource> = Arc::new(HttpHoldingsSource::from_settings(settings));

        let cache: Arc<dyn HoldingsCache> = match &settings.cache_path {
            Some(path) => Arc::new(FileHoldingsCache::new(path.clone())),
            None => Arc::new(InMemoryHoldingsCache::new()),
        };

        let connectivity: Arc<dyn ConnectivitySignal> = match &settings.connectivity_probe {
            Some(target) => Arc::new(TcpProbeConnectivity::new(
                target.clone(),
                std::time::Duration::from_millis(settings.probe_timeout_ms),
            )),
            None => Arc::new(ManualConnectivity::online()),
        };

        Ok(Self::new(source, cache, connectivity))
    }

    // ── Holdings ────────────────────────────────────────────────────

    /// Fetch holdings (remote or cached) and compute the portfolio summary.
    ///
    /// On success the view is remembered and returned. When neither the
    /// remote nor the cache has data, returns [`CoreError::NoDataAvailable`]
    /// and the previous view is kept.
    pub async fn refresh(&mut self) -> Result<PortfolioView, CoreError> {
        let outcome = self.provider.load().await?;

        let (holdings, source) = match outcome {
            HoldingsOutcome::Fresh(holdings) => (holdings, DataSource::Remote),
            HoldingsOutcome::Cached {
                holdings,
                reason,
                saved_at,
            } => (holdings, DataSource::Cache { reason, saved_at }),
            HoldingsOutcome::Unavailable(reason) => {
                return Err(CoreError::NoDataAvailable(reason));
            }
        };

        let view = PortfolioView {
            summary: analytics_service::summarize(&holdings),
            source,
        };
        self.last_view = Some(view.clone());
        Ok(view)
    }

    /// Raw holdings without the summary.
    pub async fn fetch_holdings(&self) -> Result<Vec<HoldingRecord>, CoreError> {
        self.provider.fetch_holdings().await
    }

    /// Summarize an arbitrary holdings list.
    #[must_use]
    pub fn summarize(holdings: &[HoldingRecord]) -> PortfolioSummary {
        analytics_service::summarize(holdings)
    }

    /// The last successfully refreshed view, if any.
    #[must_use]
    pub fn last_view(&self) -> Option<&PortfolioView> {
        self.last_view.as_ref()
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.provider.is_connected()
    }
}
