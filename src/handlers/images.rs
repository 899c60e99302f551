//! Image generation endpoint.

use axum::extract::State;
use axum::response::Response;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::{require_text, ApiJson};
use crate::config::Credentials;
use crate::error::GatewayError;
use crate::http::response::json_ok;
use crate::http::server::AppState;

const MAX_IMAGES: u32 = 4;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagenRequest {
    #[serde(default)]
    pub prompt: String,
    pub image_count: Option<u32>,
}

/// `POST /api/imagen` - Gemini image generation, inline base64 out.
pub async fn imagen(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ImagenRequest>,
) -> Result<Response, GatewayError> {
    require_text(&request.prompt, "prompt")?;
    let count = request.image_count.unwrap_or(1).clamp(1, MAX_IMAGES);
    let api_key =
        Credentials::require(&state.credentials().google_api_key, "GOOGLE_API_KEY")?.to_string();

    let images = state
        .gemini()
        .generate_images(&api_key, &request.prompt, count)
        .await?;

    let images: Vec<_> = images
        .into_iter()
        .map(|image| {
            json!({
                "id": Uuid::new_v4().to_string(),
                "base64": image.base64,
                "mimeType": image.mime_type,
            })
        })
        .collect();

    Ok(json_ok(&json!({
        "success": true,
        "count": images.len(),
        "images": images,
    })))
}
