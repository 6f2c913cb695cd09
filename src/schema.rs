//! Database schema management for `nutrient-telemetry`.
//!
//! Ensures the readings table and its indexes exist before serving requests.
//! Applied once on startup from `main.rs` when the PostgreSQL backend is
//! selected (EMBP: single gateway call).

use anyhow::Result;
use sqlx::PgPool;

// ---

/// Create or update the database schema (idempotent).
///
/// Creates the append-only `readings` table. `recorded_at` is the
/// sensor-supplied time; `created_at` is the insertion time. Safe to call on
/// every startup; no-op if objects already exist.
///
/// Errors are propagated if any SQL execution fails.
pub async fn create_schema(pool: &PgPool) -> Result<()> {
    // ---
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS readings (
            id          BIGSERIAL        PRIMARY KEY,
            device_id   TEXT             NOT NULL,
            recorded_at TIMESTAMPTZ      NOT NULL,
            nitrogen    DOUBLE PRECISION NOT NULL,
            phosphorus  DOUBLE PRECISION NOT NULL,
            ph          DOUBLE PRECISION NOT NULL,
            created_at  TIMESTAMPTZ      NOT NULL DEFAULT now()
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // Window queries for `GET /readings`
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_readings_recorded_at
            ON readings (recorded_at DESC);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // Per-device lookups
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_readings_device_recorded_at
            ON readings (device_id, recorded_at DESC);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}
