use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::errors::CoreError;
use crate::models::holding::{upsert_by_symbol, HoldingRecord};

use super::format;
use super::traits::HoldingsCache;

/// Decoded contents of a cache file.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSnapshot {
    pub saved_at: Option<DateTime<Utc>>,
    pub records: Vec<HoldingRecord>,
}

/// Durable cache backed by a single file on disk (native only).
///
/// Flow (write): records → bincode → HLDC header → `<path>.tmp` → rename over `<path>`
///
/// The rename is the commit point, so a crash mid-write leaves the previous
/// file intact. An in-process `RwLock` keeps readers off the file while a
/// read-modify-write (`insert_all`) is in flight.
#[derive(Debug)]
pub struct FileHoldingsCache {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileHoldingsCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Decode the cache file. A missing file is an empty snapshot.
    pub fn load_snapshot(&self) -> Result<CacheSnapshot, CoreError> {
        let _guard = self.read_guard()?;
        self.load_unlocked()
    }

    fn load_unlocked(&self) -> Result<CacheSnapshot, CoreError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(CacheSnapshot {
                    saved_at: None,
                    records: Vec::new(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let (header, payload) = format::read_file(&bytes)?;
        let records: Vec<HoldingRecord> = bincode::deserialize(payload).map_err(|e| {
            CoreError::InvalidCacheFormat(format!("Failed to decode holdings: {e}"))
        })?;

        Ok(CacheSnapshot {
            saved_at: Utc.timestamp_millis_opt(header.saved_at_millis).single(),
            records,
        })
    }

    fn store_unlocked(&self, records: &[HoldingRecord]) -> Result<(), CoreError> {
        let payload = bincode::serialize(records)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize holdings: {e}")))?;
        let bytes = format::write_file(
            format::CURRENT_VERSION,
            Utc::now().timestamp_millis(),
            &payload,
        );

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.tmp_path();
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!("Wrote {} holdings to {}", records.len(), self.path.display());
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "holdings".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn read_guard(&self) -> Result<RwLockReadGuard<'_, ()>, CoreError> {
        self.lock
            .read()
            .map_err(|_| CoreError::Storage("cache lock poisoned".into()))
    }

    fn write_guard(&self) -> Result<RwLockWriteGuard<'_, ()>, CoreError> {
        self.lock
            .write()
            .map_err(|_| CoreError::Storage("cache lock poisoned".into()))
    }
}

#[async_trait]
impl HoldingsCache for FileHoldingsCache {
    async fn read_all(&self) -> Result<Vec<HoldingRecord>, CoreError> {
        Ok(self.load_snapshot()?.records)
    }

    async fn clear(&self) -> Result<(), CoreError> {
        let _guard = self.write_guard()?;
        self.store_unlocked(&[])
    }

    async fn insert_all(&self, holdings: &[HoldingRecord]) -> Result<(), CoreError> {
        let _guard = self.write_guard()?;
        let mut records = self.load_unlocked()?.records;
        upsert_by_symbol(&mut records, holdings);
        self.store_unlocked(&records)
    }

    async fn replace_all(&self, holdings: &[HoldingRecord]) -> Result<(), CoreError> {
        let mut records = Vec::with_capacity(holdings.len());
        upsert_by_symbol(&mut records, holdings);

        let _guard = self.write_guard()?;
        self.store_unlocked(&records)
    }

    async fn last_updated(&self) -> Result<Option<DateTime<Utc>>, CoreError> {
        Ok(self.load_snapshot()?.saved_at)
    }
}
