//! End-to-end tests against a live PostgreSQL.
//!
//! Set `DATABASE_URL` to run them; without it each test returns early.

use agrimet_dashboard::{routes, schema, AggregationReport, Config, MinuteRow, Reading};
use anyhow::Result;
use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use sqlx::postgres::PgPoolOptions;

#[derive(Debug, Deserialize)]
struct IngestResponse {
    inserted: u64,
}

#[derive(Debug, Deserialize)]
struct DashboardResponse {
    equipment: String,
    #[serde(flatten)]
    report: AggregationReport,
}

/// Serve the router over a real pool; `None` when no database is configured.
async fn spawn_app(raw_row_limit: u32) -> Result<Option<String>> {
    // ---
    let Ok(db_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping database test");
        return Ok(None);
    };

    let pool = PgPoolOptions::new().max_connections(2).connect(&db_url).await?;
    schema::create_schema(&pool).await?;

    let config = Config {
        db_url,
        db_pool_max: 2,
        http_port: 0,
        station_offset: FixedOffset::east_opt(0).unwrap(),
        raw_row_limit,
        cors_allow_origin: "*".to_string(),
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = routes::router(pool, config);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(Some(format!("http://{}", addr)))
}

/// Equipment id no other test run has written to.
fn fresh_equipment(prefix: &str) -> String {
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{}-{}", prefix, nanos)
}

async fn ingest(client: &Client, base: &str, body: serde_json::Value) -> Result<u64> {
    // ---
    let response = client.post(format!("{}/api/readings", base)).json(&body).send().await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: IngestResponse = response.json().await?;
    Ok(body.inserted)
}

#[tokio::test]
async fn ingested_readings_come_back_raw_and_per_minute() -> Result<()> {
    // ---
    let Some(base) = spawn_app(100).await? else {
        return Ok(());
    };
    let client = Client::new();
    let equipment = fresh_equipment("minute");

    let inserted = ingest(
        &client,
        &base,
        json!({
            "equipment": equipment,
            "readings": [
                {
                    "timestamp": "2025-03-01T10:00:00Z",
                    "temperature": 20,
                    "humidity": 50,
                    "rainfall": 0.25
                },
                {
                    "timestamp": "2025-03-01T10:00:30Z",
                    "temperature": 22,
                    "humidity": 60,
                    "rainfall": null
                },
                { "timestamp": "2025-03-01T10:01:00Z", "temperature": 18, "rainfall": 0.5 }
            ]
        }),
    )
    .await?;
    assert_eq!(inserted, 3);

    // Both bounds are inclusive
    let raw: Vec<Reading> = client
        .get(format!(
            "{}/api/readings?equipment={}&from=2025-03-01T10:00:00Z&to=2025-03-01T10:01:00Z",
            base, equipment
        ))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(raw.len(), 3);
    assert_eq!(raw[0].timestamp, Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap());
    assert_eq!(raw[0].temperature, Some(20.0));
    assert_eq!(raw[1].rainfall, None);
    assert_eq!(raw[2].humidity, None);

    let partial: Vec<Reading> = client
        .get(format!(
            "{}/api/readings?equipment={}&from=2025-03-01T10:00:00Z&to=2025-03-01T10:00:30Z",
            base, equipment
        ))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(partial.len(), 2);

    let minutes: Vec<MinuteRow> = client
        .get(format!(
            "{}/api/readings?equipment={}&from=2025-03-01T10:00:00Z&to=2025-03-01T10:01:00Z\
             &aggregate=minute",
            base, equipment
        ))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(minutes.len(), 2);
    assert_eq!(minutes[0].minute, Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap());
    assert_eq!(minutes[0].temperature, Some(21.0));
    assert_eq!(minutes[0].humidity, Some(55.0));
    assert_eq!(minutes[0].rainfall, Some(0.25));
    assert_eq!(minutes[1].temperature, Some(18.0));
    assert_eq!(minutes[1].humidity, None);
    assert_eq!(minutes[1].rainfall, Some(0.5));

    let equipment_ids: Vec<String> = client
        .get(format!("{}/api/equipment", base))
        .send()
        .await?
        .json()
        .await?;
    assert!(equipment_ids.contains(&equipment));

    Ok(())
}

#[tokio::test]
async fn raw_query_is_capped_by_row_limit() -> Result<()> {
    // ---
    let Some(base) = spawn_app(5).await? else {
        return Ok(());
    };
    let client = Client::new();
    let equipment = fresh_equipment("capped");

    let start = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
    let readings: Vec<_> = (0..10)
        .map(|i| json!({ "timestamp": start + Duration::minutes(i), "rainfall": 1.0 }))
        .collect();
    ingest(&client, &base, json!({ "equipment": equipment, "readings": readings })).await?;

    let raw: Vec<Reading> = client
        .get(format!(
            "{}/api/readings?equipment={}&from=2025-03-01T00:00:00Z&to=2025-03-02T00:00:00Z",
            base, equipment
        ))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(raw.len(), 5);

    Ok(())
}

#[tokio::test]
async fn dashboard_summarizes_whole_window_beyond_row_limit() -> Result<()> {
    // ---
    let Some(base) = spawn_app(100).await? else {
        return Ok(());
    };
    let client = Client::new();
    let equipment = fresh_equipment("dashboard");

    // Three days every ten minutes, 1mm each: far more rows than the raw cap
    let start: DateTime<Utc> = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
    let readings: Vec<_> = (0..432)
        .map(|i| {
            json!({
                "timestamp": start + Duration::minutes(10 * i),
                "temperature": 25,
                "humidity": 50,
                "rainfall": 1.0
            })
        })
        .collect();
    let inserted =
        ingest(&client, &base, json!({ "equipment": equipment, "readings": readings })).await?;
    assert_eq!(inserted, 432);

    let dashboard: DashboardResponse = client
        .get(format!(
            "{}/api/dashboard?equipment={}&from=2025-03-01T00:00:00Z&to=2025-03-04T00:00:00Z",
            base, equipment
        ))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(dashboard.equipment, equipment);
    let report = dashboard.report;
    assert_eq!(report.total_rainfall, 432.0);
    assert_eq!(report.points.len(), 24);
    for point in &report.points {
        // 3 days x 6 readings per hour
        assert_eq!(point.total_rainfall, 18.0);
        assert_eq!(point.mean_temperature, 25.0);
        assert_eq!(point.delta_t, Some(7.0));
    }
    assert_eq!(report.points[23].hour_label, "23:00");

    Ok(())
}
