//! Append-only reading store.
//!
//! The store is an explicit capability: handlers receive a [`SharedStore`]
//! through router state rather than reaching for a process-wide handle.
//! Two backends implement [`ReadingStore`]:
//! - [`PgReadingStore`] – PostgreSQL via `sqlx`
//! - [`MemoryReadingStore`] – in-process, used for tests and local runs

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::error::StoreError;
use crate::models::{Reading, StoredReading};

mod memory;
mod postgres;

pub use memory::MemoryReadingStore;
pub use postgres::PgReadingStore;

/// Store handle shared across request handlers.
pub type SharedStore = Arc<dyn ReadingStore>;

// ---

#[async_trait]
pub trait ReadingStore: Send + Sync {
    // ---
    /// Append a validated reading, assigning its surrogate id and insertion
    /// time. Ids are strictly increasing and never reused.
    async fn append(&self, reading: Reading) -> Result<StoredReading, StoreError>;

    /// Readings with `since <= timestamp <= until`, newest first. Readings
    /// sharing a timestamp are ordered by id, highest first.
    async fn query_range(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<StoredReading>, StoreError>;

    /// Every stored reading, in the same order as [`query_range`](Self::query_range).
    async fn query_all(&self) -> Result<Vec<StoredReading>, StoreError>;

    /// Readings from the trailing `hours` ending at `now`.
    async fn query_window(
        &self,
        now: DateTime<Utc>,
        hours: u32,
    ) -> Result<Vec<StoredReading>, StoreError> {
        // ---
        let since = now - Duration::hours(i64::from(hours));
        self.query_range(since, now).await
    }
}

/// Newest-first ordering shared by every backend.
pub(crate) fn sort_newest_first(rows: &mut [StoredReading]) {
    rows.sort_by(|a, b| b.recency_key().cmp(&a.recency_key()));
}

/// Drop rows that no longer satisfy the insert-time invariants.
pub(crate) fn retain_well_formed(rows: &mut Vec<StoredReading>) {
    // ---
    rows.retain(|row| {
        let ok = row.is_well_formed();
        if !ok {
            tracing::warn!(
                id = row.id,
                device_id = %row.device_id,
                "Dropping malformed stored reading"
            );
        }
        ok
    });
}
