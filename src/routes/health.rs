// src/routes/health.rs
//! Liveness and readiness probes.
//!
//! - `GET /health` answers as long as the process is serving HTTP and never
//!   touches the database.
//! - `GET /ready` runs a trivial query and answers `503` while PostgreSQL is
//!   unreachable, so orchestrators can hold traffic back.

use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router,
};
use serde::Serialize;
use sqlx::PgPool;

use crate::Config;

/// JSON body shared by both probes.
#[derive(Serialize)]
struct ProbeResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<ProbeResponse> {
    Json(ProbeResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn ready(State((pool, _config)): State<(PgPool, Config)>) -> impl IntoResponse {
    // ---
    match sqlx::query("SELECT 1").execute(&pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(ProbeResponse {
                status: "ok",
                version: env!("CARGO_PKG_VERSION"),
            }),
        ),
        Err(e) => {
            tracing::warn!("Readiness probe failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ProbeResponse {
                    status: "unavailable",
                    version: env!("CARGO_PKG_VERSION"),
                }),
            )
        }
    }
}

pub fn router() -> Router<(PgPool, Config)> {
    // ---
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
}
