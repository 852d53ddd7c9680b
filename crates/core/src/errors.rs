use thiserror::Error;

use crate::models::outcome::FallbackReason;

/// Unified error type for the entire holdings-tracker-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Remote source / Network ─────────────────────────────────────
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Empty data")]
    EmptyResponse,

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Invalid holding: {0}")]
    InvalidHolding(String),

    // ── Fallback exhausted ──────────────────────────────────────────
    #[error("{0}")]
    NoDataAvailable(FallbackReason),

    // ── Cache storage ───────────────────────────────────────────────
    #[error("Invalid cache file format: {0}")]
    InvalidCacheFormat(String),

    #[error("Unsupported cache file version: {0}")]
    UnsupportedVersion(u16),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("File I/O error: {0}")]
    FileIO(String),

    #[error("Cache storage error: {0}")]
    Storage(String),

    // ── Configuration ───────────────────────────────────────────────
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Coarse classification of a [`CoreError`], used by callers to pick a
/// user-facing message without matching on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The remote call failed: network, HTTP status, or an unusable payload.
    Transport,
    /// The remote call succeeded but carried no body.
    EmptyResponse,
    /// Neither the remote source nor the cache could supply holdings.
    NoDataAvailable,
    Storage,
    Config,
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Network(_)
            | CoreError::HttpStatus { .. }
            | CoreError::Deserialization(_)
            | CoreError::InvalidHolding(_) => ErrorKind::Transport,
            CoreError::EmptyResponse => ErrorKind::EmptyResponse,
            CoreError::NoDataAvailable(_) => ErrorKind::NoDataAvailable,
            CoreError::InvalidCacheFormat(_)
            | CoreError::UnsupportedVersion(_)
            | CoreError::Serialization(_)
            | CoreError::FileIO(_)
            | CoreError::Storage(_) => ErrorKind::Storage,
            CoreError::Config(_) => ErrorKind::Config,
        }
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<bincode::Error> for CoreError {
    fn from(e: bincode::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors embed the full URL; endpoints may carry tokens in the query.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
