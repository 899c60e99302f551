//! Response construction helpers.
//!
//! Every JSON response carries an explicit `charset=utf-8`. Earlier
//! versions of the assistant omitted it and Czech/Romanian diacritics
//! arrived corrupted in some browsers, so the charset is a hard
//! requirement here, not a nicety.

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::Response;
use bytes::Bytes;
use serde::Serialize;

pub const JSON_UTF8: &str = "application/json; charset=utf-8";
pub const AUDIO_MPEG: &str = "audio/mpeg";

/// 200 with a JSON body.
pub fn json_ok<T: Serialize>(value: &T) -> Response {
    json_with_status(StatusCode::OK, value)
}

/// Arbitrary status with a JSON body.
pub fn json_with_status<T: Serialize>(status: StatusCode, value: &T) -> Response {
    let body = serde_json::to_vec(value).unwrap_or_default();
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, JSON_UTF8)
        .body(Body::from(body))
        .unwrap_or_default()
}

/// Error envelope: `{"error": ...}`.
pub fn json_error(status: StatusCode, message: &str) -> Response {
    json_with_status(status, &serde_json::json!({ "error": message }))
}

/// Binary MPEG audio relay.
pub fn audio_response(bytes: Bytes) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, AUDIO_MPEG)
        .header(header::CONTENT_LENGTH, bytes.len())
        .body(Body::from(bytes))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_ok_sets_utf8_charset() {
        let response = json_ok(&serde_json::json!({"success": true}));
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            JSON_UTF8
        );
    }

    #[test]
    fn json_error_wraps_message() {
        let response = json_error(StatusCode::BAD_REQUEST, "query is required");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
