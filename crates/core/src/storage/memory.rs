use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::errors::CoreError;
use crate::models::holding::{upsert_by_symbol, HoldingRecord};
use super::traits::HoldingsCache;

#[derive(Debug, Default)]
struct CacheState {
    records: Vec<HoldingRecord>,
    updated_at: Option<DateTime<Utc>>,
}

/// Process-local cache. Nothing survives a restart.
///
/// Every mutation runs under a single write guard, so `replace_all` is
/// observed as one step by readers.
#[derive(Debug, Default)]
pub struct InMemoryHoldingsCache {
    state: RwLock<CacheState>,
}

impl InMemoryHoldingsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `holdings` already cached (useful for seeding and tests).
    pub fn with_holdings(holdings: Vec<HoldingRecord>) -> Self {
        let mut records = Vec::with_capacity(holdings.len());
        upsert_by_symbol(&mut records, &holdings);
        Self {
            state: RwLock::new(CacheState {
                records,
                updated_at: Some(Utc::now()),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.read().map(|s| s.records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, CacheState>, CoreError> {
        self.state
            .read()
            .map_err(|_| CoreError::Storage("cache lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, CacheState>, CoreError> {
        self.state
            .write()
            .map_err(|_| CoreError::Storage("cache lock poisoned".into()))
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl HoldingsCache for InMemoryHoldingsCache {
    async fn read_all(&self) -> Result<Vec<HoldingRecord>, CoreError> {
        Ok(self.read()?.records.clone())
    }

    async fn clear(&self) -> Result<(), CoreError> {
        let mut state = self.write()?;
        state.records.clear();
        state.updated_at = Some(Utc::now());
        Ok(())
    }

    async fn insert_all(&self, holdings: &[HoldingRecord]) -> Result<(), CoreError> {
        let mut state = self.write()?;
        upsert_by_symbol(&mut state.records, holdings);
        state.updated_at = Some(Utc::now());
        Ok(())
    }

    async fn replace_all(&self, holdings: &[HoldingRecord]) -> Result<(), CoreError> {
        let mut records = Vec::with_capacity(holdings.len());
        upsert_by_symbol(&mut records, holdings);

        let mut state = self.write()?;
        state.records = records;
        state.updated_at = Some(Utc::now());
        Ok(())
    }

    async fn last_updated(&self) -> Result<Option<DateTime<Utc>>, CoreError> {
        Ok(self.read()?.updated_at)
    }
}
