use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::holding::HoldingRecord;

/// Why the provider fell back to the local cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallbackReason {
    /// The connectivity signal reported no connection; the remote was not called.
    Offline,
    /// The remote call was attempted and failed with the given message.
    RemoteFailed(String),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Offline => {
                write!(f, "No internet and no stored data available")
            }
            FallbackReason::RemoteFailed(cause) => {
                write!(f, "Failed to fetch holdings ({cause}) and no stored data available")
            }
        }
    }
}

/// Result of a single fetch-or-cache decision.
#[derive(Debug, Clone, PartialEq)]
pub enum HoldingsOutcome {
    /// Fetched from the remote source; the cache now holds exactly this set.
    Fresh(Vec<HoldingRecord>),

    /// Served from the cache after a fallback.
    Cached {
        holdings: Vec<HoldingRecord>,
        reason: FallbackReason,
        saved_at: Option<DateTime<Utc>>,
    },

    /// Fallback found an empty cache.
    Unavailable(FallbackReason),
}

impl HoldingsOutcome {
    pub fn holdings(&self) -> Option<&[HoldingRecord]> {
        match self {
            HoldingsOutcome::Fresh(h) | HoldingsOutcome::Cached { holdings: h, .. } => {
                Some(h.as_slice())
            }
            HoldingsOutcome::Unavailable(_) => None,
        }
    }

    /// Where the holdings came from, or `None` when there are none.
    pub fn source(&self) -> Option<DataSource> {
        match self {
            HoldingsOutcome::Fresh(_) => Some(DataSource::Remote),
            HoldingsOutcome::Cached {
                reason, saved_at, ..
            } => Some(DataSource::Cache {
                reason: reason.clone(),
                saved_at: *saved_at,
            }),
            HoldingsOutcome::Unavailable(_) => None,
        }
    }
}

/// Origin of the data behind a rendered portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataSource {
    Remote,
    Cache {
        reason: FallbackReason,
        saved_at: Option<DateTime<Utc>>,
    },
}

impl DataSource {
    pub fn is_stale(&self) -> bool {
        matches!(self, DataSource::Cache { .. })
    }
}
