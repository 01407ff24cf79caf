//! Query layer over the `weather_readings` table.
//!
//! Every function takes the pool explicitly and returns `sqlx::Error`
//! untouched; routes decide how failures are reported.

use sqlx::PgPool;
use tracing::debug;

use crate::models::{MinuteRow, Reading};
use crate::window::TimeWindow;

// ---

/// Raw readings of one equipment inside `window`, oldest first.
pub async fn fetch_raw(
    pool: &PgPool,
    equipment_id: &str,
    window: &TimeWindow,
    limit: u32,
) -> Result<Vec<Reading>, sqlx::Error> {
    // ---
    debug!(
        "fetch_raw equipment={} start={} end={} limit={}",
        equipment_id, window.start, window.end, limit
    );

    sqlx::query_as::<_, Reading>(
        r#"
        SELECT recorded_at AS timestamp, temperature, humidity, rainfall
        FROM weather_readings
        WHERE equipment_id = $1
          AND recorded_at BETWEEN $2 AND $3
        ORDER BY recorded_at
        LIMIT $4
        "#,
    )
    .bind(equipment_id)
    .bind(window.start)
    .bind(window.end)
    .bind(i64::from(limit))
    .fetch_all(pool)
    .await
}

/// Every reading of one equipment inside `window`, oldest first, uncapped.
///
/// The dashboard summary needs the whole window: totals over a truncated
/// set would be silently wrong.
pub async fn fetch_window(
    pool: &PgPool,
    equipment_id: &str,
    window: &TimeWindow,
) -> Result<Vec<Reading>, sqlx::Error> {
    // ---
    debug!(
        "fetch_window equipment={} start={} end={}",
        equipment_id, window.start, window.end
    );

    sqlx::query_as::<_, Reading>(
        r#"
        SELECT recorded_at AS timestamp, temperature, humidity, rainfall
        FROM weather_readings
        WHERE equipment_id = $1
          AND recorded_at BETWEEN $2 AND $3
        ORDER BY recorded_at
        "#,
    )
    .bind(equipment_id)
    .bind(window.start)
    .bind(window.end)
    .fetch_all(pool)
    .await
}

/// Per-minute rows: mean temperature and humidity, summed rainfall.
pub async fn fetch_minutes(
    pool: &PgPool,
    equipment_id: &str,
    window: &TimeWindow,
) -> Result<Vec<MinuteRow>, sqlx::Error> {
    // ---
    debug!(
        "fetch_minutes equipment={} start={} end={}",
        equipment_id, window.start, window.end
    );

    sqlx::query_as::<_, MinuteRow>(
        r#"
        SELECT
            date_trunc('minute', recorded_at) AS minute,
            AVG(temperature)                  AS temperature,
            AVG(humidity)                     AS humidity,
            SUM(rainfall)                     AS rainfall
        FROM weather_readings
        WHERE equipment_id = $1
          AND recorded_at BETWEEN $2 AND $3
        GROUP BY minute
        ORDER BY minute
        "#,
    )
    .bind(equipment_id)
    .bind(window.start)
    .bind(window.end)
    .fetch_all(pool)
    .await
}

/// Store a batch of readings atomically. Returns the number of rows written.
pub async fn insert_readings(
    pool: &PgPool,
    equipment_id: &str,
    readings: &[Reading],
) -> Result<u64, sqlx::Error> {
    // ---
    let mut tx = pool.begin().await?;
    let mut inserted = 0;

    for reading in readings {
        let result = sqlx::query(
            r#"
            INSERT INTO weather_readings (
                equipment_id, recorded_at, temperature, humidity, rainfall
            ) VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(equipment_id)
        .bind(reading.timestamp)
        .bind(reading.temperature)
        .bind(reading.humidity)
        .bind(reading.rainfall)
        .execute(&mut *tx)
        .await?;
        inserted += result.rows_affected();
    }

    tx.commit().await?;
    Ok(inserted)
}

/// Every equipment identifier that has reported at least once.
pub async fn list_equipment(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    // ---
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT DISTINCT equipment_id
        FROM weather_readings
        ORDER BY equipment_id
        "#,
    )
    .fetch_all(pool)
    .await
}
