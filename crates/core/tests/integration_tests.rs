// ═══════════════════════════════════════════════════════════════════
// Integration Tests — HoldingsTracker facade end to end
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use holdings_tracker_core::errors::{CoreError, ErrorKind};
use holdings_tracker_core::models::holding::HoldingRecord;
use holdings_tracker_core::models::outcome::{DataSource, FallbackReason};
use holdings_tracker_core::models::settings::Settings;
use holdings_tracker_core::providers::connectivity::ManualConnectivity;
use holdings_tracker_core::providers::http::HttpHoldingsSource;
use holdings_tracker_core::providers::traits::HoldingsSource;
use holdings_tracker_core::storage::file_cache::FileHoldingsCache;
use holdings_tracker_core::storage::memory::InMemoryHoldingsCache;
use holdings_tracker_core::HoldingsTracker;

/// Source that succeeds until told to fail.
struct SwitchableSource {
    holdings: Vec<HoldingRecord>,
    failing: AtomicBool,
}

impl SwitchableSource {
    fn new(holdings: Vec<HoldingRecord>) -> Arc<Self> {
        Arc::new(Self {
            holdings,
            failing: AtomicBool::new(false),
        })
    }

    fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl HoldingsSource for SwitchableSource {
    fn name(&self) -> &str {
        "Switchable"
    }

    async fn fetch_holdings(&self) -> Result<Vec<HoldingRecord>, CoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(CoreError::Network("timed out".into()))
        } else {
            Ok(self.holdings.clone())
        }
    }
}

fn reference_holding() -> HoldingRecord {
    HoldingRecord::new("REF", 100, 40.0, 50.0, 45.0)
}

// ═══════════════════════════════════════════════════════════════════
// refresh()
// ═══════════════════════════════════════════════════════════════════

mod refresh {
    use super::*;

    #[tokio::test]
    async fn fresh_view_has_summary_and_remote_source() {
        let mut tracker = HoldingsTracker::new(
            SwitchableSource::new(vec![reference_holding()]),
            Arc::new(InMemoryHoldingsCache::new()),
            Arc::new(ManualConnectivity::online()),
        );
        assert!(tracker.last_view().is_none());

        let view = tracker.refresh().await.unwrap();

        assert_eq!(view.source, DataSource::Remote);
        assert_eq!(view.summary.total_investment, 4000.0);
        assert_eq!(view.summary.current_value, 5000.0);
        assert_eq!(view.summary.total_pnl, 1000.0);
        assert_eq!(view.summary.todays_pnl, -500.0);
        assert_eq!(view.summary.pnl_percentage, 25.0);
        assert_eq!(tracker.last_view(), Some(&view));
    }

    #[tokio::test]
    async fn remote_failure_serves_stale_view() {
        let source = SwitchableSource::new(vec![reference_holding()]);
        let mut tracker = HoldingsTracker::new(
            source.clone(),
            Arc::new(InMemoryHoldingsCache::new()),
            Arc::new(ManualConnectivity::online()),
        );

        tracker.refresh().await.unwrap();
        source.fail();
        let view = tracker.refresh().await.unwrap();

        assert!(view.source.is_stale());
        match &view.source {
            DataSource::Cache { reason, saved_at } => {
                assert!(matches!(reason, FallbackReason::RemoteFailed(_)));
                assert!(saved_at.is_some());
            }
            DataSource::Remote => panic!("expected cached view"),
        }
        assert_eq!(view.summary.total_pnl, 1000.0);
    }

    #[tokio::test]
    async fn offline_without_cache_keeps_previous_view() {
        let signal = Arc::new(ManualConnectivity::online());
        let cache = Arc::new(InMemoryHoldingsCache::new());
        let source = SwitchableSource::new(vec![]);
        let mut tracker = HoldingsTracker::new(source, cache, signal.clone());

        // Empty remote list succeeds and leaves an empty cache.
        let first = tracker.refresh().await.unwrap();
        assert!(first.summary.holdings.is_empty());

        signal.set_connected(false);
        assert!(!tracker.is_connected());

        let err = tracker.refresh().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoDataAvailable);
        assert_eq!(tracker.last_view(), Some(&first));
    }

    #[tokio::test]
    async fn fetch_holdings_returns_raw_records() {
        let tracker = HoldingsTracker::new(
            SwitchableSource::new(vec![reference_holding()]),
            Arc::new(InMemoryHoldingsCache::new()),
            Arc::new(ManualConnectivity::online()),
        );
        assert_eq!(tracker.fetch_holdings().await.unwrap(), vec![reference_holding()]);
    }

    #[test]
    fn summarize_is_exposed_on_facade() {
        let summary = HoldingsTracker::summarize(&[reference_holding()]);
        assert_eq!(summary.pnl_percentage, 25.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Full stack: HTTP source + file cache
// ═══════════════════════════════════════════════════════════════════

mod full_stack {
    use super::*;

    async fn serve_once(body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{addr}/")
    }

    #[tokio::test]
    async fn http_refresh_persists_for_offline_restart() {
        let url = serve_once(
            r#"{"data":{"userHolding":[{"symbol":"REF","quantity":100,"ltp":50,"avgPrice":40,"close":45}]}}"#,
        )
        .await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holdings.bin");

        let mut online = HoldingsTracker::new(
            Arc::new(HttpHoldingsSource::new(url.clone())),
            Arc::new(FileHoldingsCache::new(&path)),
            Arc::new(ManualConnectivity::online()),
        );
        let fresh = online.refresh().await.unwrap();
        assert_eq!(fresh.source, DataSource::Remote);
        drop(online);

        // New process, no network: the file cache answers.
        let mut offline = HoldingsTracker::new(
            Arc::new(HttpHoldingsSource::new(url)),
            Arc::new(FileHoldingsCache::new(&path)),
            Arc::new(ManualConnectivity::offline()),
        );
        let cached = offline.refresh().await.unwrap();
        assert!(cached.source.is_stale());
        assert_eq!(cached.summary, fresh.summary);
    }

    #[tokio::test]
    async fn from_settings_wires_http_and_file_cache() {
        let url = serve_once(r#"{"data":{"userHolding":[]}}"#).await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache").join("holdings.bin");

        let mut settings = Settings::new(url);
        settings.cache_path = Some(path.clone());

        let mut tracker = HoldingsTracker::from_settings(&settings).unwrap();
        assert!(tracker.is_connected());

        let view = tracker.refresh().await.unwrap();
        assert!(view.summary.holdings.is_empty());
        assert!(path.exists());
    }

    #[test]
    fn from_settings_rejects_invalid_config() {
        let err = HoldingsTracker::from_settings(&Settings::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn from_settings_with_unreachable_probe_is_offline() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut settings = Settings::new("http://127.0.0.1:1/");
        settings.connectivity_probe = Some(addr.to_string());
        settings.probe_timeout_ms = 200;

        let tracker = HoldingsTracker::from_settings(&settings).unwrap();
        assert!(!tracker.is_connected());
    }
}
