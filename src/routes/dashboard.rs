//! Dashboard endpoints: chart-ready hourly buckets with Delta T.
//!
//! - `GET /api/dashboard` loads an equipment's readings for the selected
//!   window and summarizes them.
//! - `POST /api/aggregate` summarizes readings supplied in the request body
//!   without touching the database.

use axum::{
    extract::rejection::JsonRejection,
    extract::Query, extract::State, http::StatusCode, response::IntoResponse, routing::get,
    routing::post, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{debug, error, info};

use super::{error_response, rejection_response};
use crate::aggregate::{summarize, BucketMode};
use crate::error::InputError;
use crate::models::{AggregationReport, Reading};
use crate::window::{RangePreset, TimeWindow};
use crate::{store, Config};

// ---

pub fn router() -> Router<(PgPool, Config)> {
    // ---
    Router::new()
        .route("/api/dashboard", get(dashboard_handler))
        .route("/api/aggregate", post(aggregate_handler))
}

/// Query parameters for `GET /api/dashboard`.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    equipment: Option<String>,
    /// `24h`, `7d` or `30d`; ignored when `from` and `to` are both given.
    range: Option<String>,
    from: Option<String>,
    to: Option<String>,
    bucket: Option<String>,
}

/// Query parameters for `POST /api/aggregate`.
#[derive(Debug, Default, Deserialize)]
pub struct AggregateQuery {
    bucket: Option<String>,
}

#[derive(Debug, Serialize)]
struct DashboardResponse {
    equipment: String,
    window: TimeWindow,
    bucket: BucketMode,
    #[serde(flatten)]
    report: AggregationReport,
}

fn parse_bucket(raw: Option<&str>) -> Result<BucketMode, InputError> {
    raw.map_or(Ok(BucketMode::default()), str::parse)
}

impl DashboardQuery {
    /// Custom bounds win over the preset; the preset defaults to 24h.
    fn window(&self, now: DateTime<Utc>) -> Result<TimeWindow, InputError> {
        // ---
        match (self.from.as_deref(), self.to.as_deref()) {
            (Some(from), Some(to)) => TimeWindow::from_bounds(from, to),
            _ => {
                let preset = self
                    .range
                    .as_deref()
                    .map_or(Ok(RangePreset::default()), str::parse::<RangePreset>)?;
                Ok(preset.window(now))
            }
        }
    }

    fn resolve(&self, now: DateTime<Utc>) -> Result<(&str, TimeWindow, BucketMode), InputError> {
        // ---
        let equipment = self
            .equipment
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or(InputError::MissingParameter("equipment"))?;
        let window = self.window(now)?;
        let bucket = parse_bucket(self.bucket.as_deref())?;
        Ok((equipment, window, bucket))
    }
}

async fn dashboard_handler(
    Query(params): Query<DashboardQuery>,
    State((pool, config)): State<(PgPool, Config)>,
) -> impl IntoResponse {
    // ---
    info!("GET /api/dashboard {:?}", params);

    let (equipment, window, bucket) = match params.resolve(Utc::now()) {
        Ok(resolved) => resolved,
        Err(e) => {
            debug!("Rejected dashboard query: {}", e);
            return error_response(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    let readings = match store::fetch_window(&pool, equipment, &window).await {
        Ok(readings) => readings,
        Err(e) => {
            error!("Failed to load readings for {}: {}", equipment, e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch data");
        }
    };

    let report = summarize(&readings, bucket, config.station_offset);
    info!(
        "Dashboard for {}: {} readings, {} buckets",
        equipment,
        readings.len(),
        report.points.len()
    );

    (
        StatusCode::OK,
        Json(DashboardResponse {
            equipment: equipment.to_string(),
            window,
            bucket,
            report,
        }),
    )
        .into_response()
}

async fn aggregate_handler(
    Query(params): Query<AggregateQuery>,
    State((_pool, config)): State<(PgPool, Config)>,
    payload: Result<Json<Vec<Reading>>, JsonRejection>,
) -> impl IntoResponse {
    // ---
    let Json(readings) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };
    let bucket = match parse_bucket(params.bucket.as_deref()) {
        Ok(bucket) => bucket,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    debug!("POST /api/aggregate readings={} bucket={:?}", readings.len(), bucket);
    let report = summarize(&readings, bucket, config.station_offset);
    (StatusCode::OK, Json(report)).into_response()
}
