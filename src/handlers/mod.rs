//! One module per endpoint family of the `/api/*` surface.

pub mod audio;
pub mod chat;
pub mod documents;
pub mod health;
pub mod images;
pub mod search;

use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;

use crate::error::GatewayError;

/// JSON extractor whose rejection is the gateway's own 400 envelope
/// instead of axum's plain-text rejection.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = GatewayError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(GatewayError::Validation(rejection.body_text())),
        }
    }
}

/// Reject empty or whitespace-only required string fields.
fn require_text(value: &str, field: &str) -> Result<(), GatewayError> {
    if value.trim().is_empty() {
        return Err(GatewayError::Validation(format!("{field} is required")));
    }
    Ok(())
}
