//! Minimal CORS handling for the browser dashboard.
//!
//! The dashboard is served from a different origin than the API, so every
//! routed response carries the allow headers and preflight `OPTIONS`
//! requests are answered directly with `204 No Content`.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

// ---

pub async fn cors(State(origin): State<HeaderValue>, request: Request, next: Next) -> Response {
    // ---
    let mut response = if request.method() == Method::OPTIONS {
        tracing::debug!("CORS preflight for {}", request.uri());
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("content-type"),
    );
    response
}
