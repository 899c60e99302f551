//! Upstream provider clients.
//!
//! One module per provider, each a thin reqwest wrapper: build the
//! provider-specific request, make exactly one HTTPS call, reshape the
//! response. No retries, no backoff; an upstream failure surfaces
//! immediately as [`GatewayError::Upstream`].

pub mod claude;
pub mod document_ai;
pub mod elevenlabs;
pub mod gemini;
pub mod google_auth;
pub mod google_search;
pub mod google_tts;
pub mod grok;
pub mod openai;
pub mod perplexity;
pub mod serpapi;
pub mod storage;

use crate::error::GatewayError;

/// Pass a 2xx response through; read anything else as text and relay it
/// with the upstream's status code.
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(GatewayError::Upstream {
        status: status.as_u16(),
        body,
    })
}
