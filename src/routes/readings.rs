//! Station reading endpoints: query, ingest, and equipment listing.
//!
//! `GET /api/readings` is what the dashboard's raw table and the export
//! buttons consume. `aggregate=minute` switches to per-minute rows; any other
//! value (or none) returns raw rows.

use axum::{
    extract::rejection::JsonRejection,
    extract::Query, extract::State, http::StatusCode, response::IntoResponse, routing::get, Json,
    Router,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{debug, error, info};

use super::{error_response, rejection_response};
use crate::error::InputError;
use crate::models::IngestBatch;
use crate::window::TimeWindow;
use crate::{store, Config};

// ---

pub fn router() -> Router<(PgPool, Config)> {
    // ---
    Router::new()
        .route("/api/readings", get(query_handler).post(ingest_handler))
        .route("/api/equipment", get(equipment_handler))
}

/// Query parameters for `GET /api/readings`.
#[derive(Debug, Deserialize)]
pub struct ReadingsQuery {
    equipment: Option<String>,
    from: Option<String>,
    to: Option<String>,
    aggregate: Option<String>,
}

impl ReadingsQuery {
    /// Validate the parameters into an equipment id and a window.
    fn resolve(&self) -> Result<(&str, TimeWindow), InputError> {
        // ---
        let equipment = self
            .equipment
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or(InputError::MissingParameter("equipment"))?;
        let from = self.from.as_deref().ok_or(InputError::MissingParameter("from"))?;
        let to = self.to.as_deref().ok_or(InputError::MissingParameter("to"))?;

        Ok((equipment, TimeWindow::from_bounds(from, to)?))
    }

    fn per_minute(&self) -> bool {
        self.aggregate.as_deref() == Some("minute")
    }
}

async fn query_handler(
    Query(params): Query<ReadingsQuery>,
    State((pool, config)): State<(PgPool, Config)>,
) -> impl IntoResponse {
    // ---
    info!("GET /api/readings {:?}", params);

    let (equipment, window) = match params.resolve() {
        Ok(resolved) => resolved,
        Err(e) => {
            debug!("Rejected readings query: {}", e);
            return error_response(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    if params.per_minute() {
        match store::fetch_minutes(&pool, equipment, &window).await {
            Ok(rows) => {
                info!("Returning {} minute rows for {}", rows.len(), equipment);
                (StatusCode::OK, Json(rows)).into_response()
            }
            Err(e) => {
                error!("Failed to query minute rows for {}: {}", equipment, e);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch data")
            }
        }
    } else {
        match store::fetch_raw(&pool, equipment, &window, config.raw_row_limit).await {
            Ok(rows) => {
                info!("Returning {} raw rows for {}", rows.len(), equipment);
                (StatusCode::OK, Json(rows)).into_response()
            }
            Err(e) => {
                error!("Failed to query raw rows for {}: {}", equipment, e);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch data")
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct IngestResponse {
    inserted: u64,
}

async fn ingest_handler(
    State((pool, _config)): State<(PgPool, Config)>,
    payload: Result<Json<IngestBatch>, JsonRejection>,
) -> impl IntoResponse {
    // ---
    let Json(batch) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };
    info!(
        "POST /api/readings equipment={} readings={}",
        batch.equipment,
        batch.readings.len()
    );

    if batch.equipment.trim().is_empty() {
        let e = InputError::MissingParameter("equipment");
        return error_response(StatusCode::BAD_REQUEST, e.to_string());
    }

    match store::insert_readings(&pool, &batch.equipment, &batch.readings).await {
        Ok(inserted) => (StatusCode::CREATED, Json(IngestResponse { inserted })).into_response(),
        Err(e) => {
            error!("Failed to store readings for {}: {}", batch.equipment, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to store data")
        }
    }
}

async fn equipment_handler(State((pool, _config)): State<(PgPool, Config)>) -> impl IntoResponse {
    // ---
    match store::list_equipment(&pool).await {
        Ok(ids) => (StatusCode::OK, Json(ids)).into_response(),
        Err(e) => {
            error!("Failed to list equipment: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch data")
        }
    }
}
