//! Cross-cutting request handling.
//!
//! The original assistant duplicated CORS and method checks in every
//! handler; here they are applied once at the router level: a permissive
//! CORS layer, an OPTIONS/405 fallback shared by every API route, and a
//! metrics middleware recording one observation per request.

use std::time::Instant;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tower_http::cors::{Any, CorsLayer};

use crate::error::GatewayError;
use crate::http::response::json_error;
use crate::observability::metrics;

/// Permissive CORS for the browser frontend.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Shared fallback for API method routers: plain `OPTIONS` answers 200
/// with no body (preflights are short-circuited by the CORS layer),
/// anything else is 405.
pub async fn method_fallback(request: Request<Body>) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    GatewayError::MethodNotAllowed.into_response()
}

/// Unknown path under the API surface.
pub async fn not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "unknown endpoint")
}

/// Per-request metrics observation.
pub async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let path = request.uri().path().to_string();
    let method = request.method().to_string();

    let response = next.run(request).await;

    metrics::record_request(&method, &path, response.status().as_u16(), start);
    response
}
