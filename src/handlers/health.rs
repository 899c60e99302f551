//! Liveness endpoint.

use axum::response::Response;
use serde_json::json;

use crate::http::response::json_ok;

/// `GET /health`
pub async fn health() -> Response {
    json_ok(&json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
