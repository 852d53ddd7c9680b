use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::CoreError;
use crate::models::holding::HoldingRecord;

/// Local store of the last known holdings, keyed by symbol.
///
/// `clear` and `insert_all` exist for completeness, but a refresh must go
/// through [`HoldingsCache::replace_all`]: implementations guarantee a
/// concurrent `read_all` sees either the old set or the new set, never a
/// cleared or half-written one.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait HoldingsCache: Send + Sync {
    /// All cached records, in insertion order.
    async fn read_all(&self) -> Result<Vec<HoldingRecord>, CoreError>;

    async fn clear(&self) -> Result<(), CoreError>;

    /// Upsert by symbol; existing symbols are overwritten in place.
    async fn insert_all(&self, holdings: &[HoldingRecord]) -> Result<(), CoreError>;

    /// Atomically clear the cache and insert `holdings`.
    async fn replace_all(&self, holdings: &[HoldingRecord]) -> Result<(), CoreError>;

    /// When the cache was last written, if ever.
    async fn last_updated(&self) -> Result<Option<DateTime<Utc>>, CoreError>;
}
