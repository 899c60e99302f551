//! Gateway error taxonomy.
//!
//! Every handler returns `Result<Response, GatewayError>`; the
//! `IntoResponse` impl maps each variant onto its HTTP status and a JSON
//! `{"error": ...}` body with an explicit UTF-8 charset header.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::http::response::json_error;

/// Errors surfaced by API handlers.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A required server-side credential or setting is missing.
    /// The upstream call is never attempted.
    #[error("{0}")]
    Configuration(String),

    /// The request body is missing a required field or is malformed.
    #[error("{0}")]
    Validation(String),

    /// The upstream provider answered with a non-2xx status.
    /// The status and body text are relayed to the caller verbatim.
    #[error("upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The upstream request itself failed (connect, timeout, decode).
    ///
    /// Failures after a streaming response has started never reach this
    /// type; they terminate the stream with an error frame instead.
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Method other than POST/OPTIONS on an API route.
    #[error("method not allowed")]
    MethodNotAllowed,
}

impl GatewayError {
    /// Missing environment credential, named for the log line.
    pub fn missing_credential(var: &str) -> Self {
        GatewayError::Configuration(format!("{var} is not configured"))
    }

    fn status(&self) -> StatusCode {
        match self {
            GatewayError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            GatewayError::Transport(_) => StatusCode::BAD_GATEWAY,
            GatewayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            GatewayError::Validation(msg) => {
                tracing::debug!(error = %msg, "request rejected")
            }
            GatewayError::Upstream { status, body } => {
                tracing::warn!(upstream_status = status, body = %body, "upstream error relayed")
            }
            GatewayError::MethodNotAllowed => {}
            other => tracing::error!(error = %other, "handler failed"),
        }
        json_error(status, &self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_status_is_relayed() {
        let err = GatewayError::Upstream {
            status: 429,
            body: "rate limited".into(),
        };
        assert_eq!(err.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn unknown_upstream_status_falls_back_to_bad_gateway() {
        let err = GatewayError::Upstream {
            status: 42,
            body: String::new(),
        };
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn validation_maps_to_400() {
        assert_eq!(
            GatewayError::Validation("query is required".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
