//! In-process [`ReadingStore`] backed by a vector behind an async `RwLock`.
//!
//! Id assignment happens under the write lock, so concurrent appends get
//! distinct, strictly increasing ids. Reads clone a snapshot and release the
//! lock before sorting.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{retain_well_formed, sort_newest_first, ReadingStore};
use crate::error::StoreError;
use crate::models::{Reading, StoredReading};

#[derive(Debug, Default)]
pub struct MemoryReadingStore {
    rows: RwLock<Vec<StoredReading>>,
}

impl MemoryReadingStore {
    // ---
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of readings held.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    async fn snapshot<F>(&self, keep: F) -> Vec<StoredReading>
    where
        F: Fn(&StoredReading) -> bool,
    {
        // ---
        let mut rows: Vec<StoredReading> = {
            let guard = self.rows.read().await;
            guard.iter().filter(|r| keep(r)).cloned().collect()
        };
        retain_well_formed(&mut rows);
        sort_newest_first(&mut rows);
        rows
    }
}

#[async_trait]
impl ReadingStore for MemoryReadingStore {
    // ---
    async fn append(&self, reading: Reading) -> Result<StoredReading, StoreError> {
        // ---
        let mut rows = self.rows.write().await;
        let id = rows.last().map_or(1, |last| last.id + 1);
        let stored = reading.into_stored(id, Utc::now());
        rows.push(stored.clone());
        tracing::debug!(id, device_id = %stored.device_id, "Appended reading (memory)");
        Ok(stored)
    }

    async fn query_range(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<StoredReading>, StoreError> {
        // ---
        Ok(self
            .snapshot(|r| r.timestamp >= since && r.timestamp <= until)
            .await)
    }

    async fn query_all(&self) -> Result<Vec<StoredReading>, StoreError> {
        Ok(self.snapshot(|_| true).await)
    }
}
