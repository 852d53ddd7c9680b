use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::errors::CoreError;

/// Runtime configuration for wiring a [`crate::HoldingsTracker`].
///
/// Every field has a default, so a JSON file only needs the keys it changes
/// (in practice at least `endpoint_url`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Holdings endpoint, fetched with a plain GET.
    pub endpoint_url: String,

    /// Where the durable cache lives. `None` keeps the cache in memory only.
    pub cache_path: Option<PathBuf>,

    /// Whole-request timeout for the remote call.
    pub request_timeout_secs: u64,

    /// `host:port` probed over TCP to decide connectivity.
    /// `None` assumes the device is always online.
    pub connectivity_probe: Option<String>,

    pub probe_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint_url: String::new(),
            cache_path: None,
            request_timeout_secs: 30,
            connectivity_probe: None,
            probe_timeout_ms: 1500,
        }
    }
}

impl Settings {
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        let settings: Settings =
            serde_json::from_str(json).map_err(|e| CoreError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, CoreError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let url = self.endpoint_url.trim();
        if url.is_empty() {
            return Err(CoreError::Config("endpoint_url must be set".into()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(CoreError::Config(format!(
                "endpoint_url must be an http(s) URL, got {url}"
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(CoreError::Config("request_timeout_secs must be > 0".into()));
        }
        if let Some(probe) = &self.connectivity_probe {
            if !probe.contains(':') {
                return Err(CoreError::Config(format!(
                    "connectivity_probe must be host:port, got {probe}"
                )));
            }
            if self.probe_timeout_ms == 0 {
                return Err(CoreError::Config("probe_timeout_ms must be > 0".into()));
            }
        }
        Ok(())
    }
}
