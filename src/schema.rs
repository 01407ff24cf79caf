//! Database schema management for `agrimet-dashboard`.
//!
//! Ensures required tables and indexes exist before serving requests.
//! Applied once on startup from `main.rs` (EMBP: single gateway call).

use anyhow::Result;
use sqlx::PgPool;

// ---

/// Create the database schema (idempotent).
///
/// Creates the `weather_readings` table holding one row per station reading,
/// plus the index every dashboard query filters on. Safe to call on every
/// startup; no-op if objects already exist.
///
/// Errors are propagated if any SQL execution fails.
pub async fn create_schema(pool: &PgPool) -> Result<()> {
    // ---
    let mut tx = pool.begin().await?;

    // Sensor fields are nullable: a station may report without a gauge
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS weather_readings (
            id            BIGSERIAL PRIMARY KEY,
            equipment_id  TEXT             NOT NULL,
            recorded_at   TIMESTAMPTZ      NOT NULL,
            temperature   DOUBLE PRECISION,
            humidity      DOUBLE PRECISION,
            rainfall      DOUBLE PRECISION
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_weather_readings_equipment_time
            ON weather_readings (equipment_id, recorded_at);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}
