//! PostgreSQL [`ReadingStore`].
//!
//! `BIGSERIAL` supplies the surrogate id and `created_at` defaults to the
//! insert time, so concurrent appends are serialized by the database alone.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{retain_well_formed, ReadingStore};
use crate::error::StoreError;
use crate::models::{Reading, StoredReading};

const COLUMNS: &str = "id, device_id, recorded_at, nitrogen, phosphorus, ph, created_at";

#[derive(Debug, Clone)]
pub struct PgReadingStore {
    pool: PgPool,
}

impl PgReadingStore {
    // ---
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReadingStore for PgReadingStore {
    // ---
    async fn append(&self, reading: Reading) -> Result<StoredReading, StoreError> {
        // ---
        let sql = format!(
            r#"
            INSERT INTO readings (device_id, recorded_at, nitrogen, phosphorus, ph)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        );
        let stored = sqlx::query_as::<_, StoredReading>(&sql)
            .bind(&reading.device_id)
            .bind(reading.timestamp)
            .bind(reading.nitrogen)
            .bind(reading.phosphorus)
            .bind(reading.ph)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!(id = stored.id, device_id = %stored.device_id, "Appended reading");
        Ok(stored)
    }

    async fn query_range(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<StoredReading>, StoreError> {
        // ---
        let sql = format!(
            r#"
            SELECT {COLUMNS} FROM readings
            WHERE recorded_at >= $1 AND recorded_at <= $2
            ORDER BY recorded_at DESC, id DESC
            "#
        );
        let mut rows = sqlx::query_as::<_, StoredReading>(&sql)
            .bind(since)
            .bind(until)
            .fetch_all(&self.pool)
            .await?;

        retain_well_formed(&mut rows);
        Ok(rows)
    }

    async fn query_all(&self) -> Result<Vec<StoredReading>, StoreError> {
        // ---
        let sql = format!("SELECT {COLUMNS} FROM readings ORDER BY recorded_at DESC, id DESC");
        let mut rows = sqlx::query_as::<_, StoredReading>(&sql)
            .fetch_all(&self.pool)
            .await?;

        retain_well_formed(&mut rows);
        Ok(rows)
    }
}
