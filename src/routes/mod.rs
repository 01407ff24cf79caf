//! Routes gateway: the only place `main.rs` (and the integration tests) get
//! an HTTP surface from.
//!
//! Sibling modules each export a subrouter over the shared `(PgPool, Config)`
//! state; this gateway merges them, installs state and the CORS layer.

use axum::{
    extract::rejection::JsonRejection,
    http::{HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::Serialize;
use sqlx::PgPool;

use crate::Config;

mod cors;
mod dashboard;
mod health;
mod readings;

// ---

pub fn router(pool: PgPool, config: Config) -> Router {
    // ---
    let origin = HeaderValue::from_str(&config.cors_allow_origin).unwrap_or_else(|_| {
        tracing::warn!(
            "CORS_ALLOW_ORIGIN '{}' is not a valid header value, using '*'",
            config.cors_allow_origin
        );
        HeaderValue::from_static("*")
    });

    Router::new()
        .merge(readings::router())
        .merge(dashboard::router())
        .merge(health::router())
        .with_state((pool, config))
        .layer(middleware::from_fn_with_state(origin, cors::cors))
}

/// JSON body of every non-2xx response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Build a `{"error": ...}` response. Callers log the detail themselves and
/// pass only a message that is safe to show a user.
fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    // ---
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Report a body that failed to deserialize with the usual error shape.
fn rejection_response(rejection: JsonRejection) -> Response {
    // ---
    tracing::debug!("Rejected request body: {}", rejection.body_text());
    error_response(rejection.status(), rejection.body_text())
}
