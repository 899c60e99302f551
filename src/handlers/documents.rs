//! Document endpoints: signed upload URLs, Document AI extraction, and
//! the Gemini Files API bridge.

use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::response::Response;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::{require_text, ApiJson};
use crate::error::GatewayError;
use crate::http::response::json_ok;
use crate::http::server::AppState;
use crate::providers::storage::object_name_for;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlRequest {
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub file_type: String,
    pub file_size: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcsDocumentRequest {
    #[serde(default)]
    pub gcs_uri: String,
    #[serde(default)]
    pub original_name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiUploadRequest {
    #[serde(default)]
    pub pdf_url: String,
    #[serde(default)]
    pub original_name: String,
}

/// `POST /api/get-upload-url` - V4 signed PUT/GET pair for one object.
pub async fn get_upload_url(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UploadUrlRequest>,
) -> Result<Response, GatewayError> {
    require_text(&request.file_name, "fileName")?;
    require_text(&request.file_type, "fileType")?;
    let limit = state.config().limits.max_signed_upload_bytes;
    if request.file_size.is_some_and(|size| size > limit) {
        return Err(GatewayError::Validation(format!(
            "file exceeds the {limit} byte upload limit"
        )));
    }

    let key = state.google_service_account()?;
    let token = state.google_access_token().await?;
    let storage = state.storage(&key)?;

    let object = object_name_for(&request.file_name, Utc::now());
    let signed = storage
        .signed_upload(&token, &object, &request.file_type)
        .await?;

    Ok(json_ok(&json!({
        "success": true,
        "uploadUrl": signed.upload_url,
        "downloadUrl": signed.download_url,
        "gcsUri": signed.gcs_uri,
        "publicUrl": signed.public_url,
        "objectName": signed.object_name,
    })))
}

/// `POST /api/process-document` - multipart document upload through
/// Document AI. The document rides in the `file` field; when no field
/// carries that name the first field with a filename is taken.
pub async fn process_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, GatewayError> {
    let mut document: Option<(String, String, Bytes)> = None;
    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let is_file = field.name() == Some("file") || field.file_name().is_some();
        if document.is_none() && is_file {
            let file_name = field.file_name().unwrap_or("document.pdf").to_string();
            let mime = field
                .content_type()
                .unwrap_or("application/pdf")
                .to_string();
            let data = field.bytes().await.map_err(bad_multipart)?;
            document = Some((file_name, mime, data));
        }
    }

    let (file_name, mime, data) =
        document.ok_or_else(|| GatewayError::Validation("file field is required".into()))?;
    if data.is_empty() {
        return Err(GatewayError::Validation("document body is required".into()));
    }
    let limit = state.config().limits.max_document_bytes;
    if data.len() > limit {
        return Err(GatewayError::Validation(format!(
            "document exceeds the {limit} byte limit"
        )));
    }

    let token = state.google_access_token().await?;
    let extracted = state
        .document_ai()?
        .process_raw(&token, &data, &mime)
        .await?;

    Ok(json_ok(&json!({
        "success": true,
        "extractedText": extracted.text,
        "pageCount": extracted.page_count,
        "fileName": file_name,
    })))
}

/// `POST /api/process-document-gcs` - Document AI reads from Storage.
pub async fn process_document_gcs(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<GcsDocumentRequest>,
) -> Result<Response, GatewayError> {
    require_text(&request.gcs_uri, "gcsUri")?;
    if !request.gcs_uri.starts_with("gs://") {
        return Err(GatewayError::Validation(
            "gcsUri must start with gs://".into(),
        ));
    }

    let token = state.google_access_token().await?;
    let extracted = state
        .document_ai()?
        .process_gcs(&token, &request.gcs_uri, "application/pdf")
        .await?;

    Ok(json_ok(&json!({
        "success": true,
        "extractedText": extracted.text,
        "pageCount": extracted.page_count,
        "fileName": request.original_name,
    })))
}

/// `POST /api/upload-to-gemini` - fetch a PDF and push it to the Gemini
/// Files API so chat requests can reference it by URI.
pub async fn upload_to_gemini(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<GeminiUploadRequest>,
) -> Result<Response, GatewayError> {
    require_text(&request.pdf_url, "pdfUrl")?;
    let api_key = crate::config::Credentials::require(
        &state.credentials().google_api_key,
        "GOOGLE_API_KEY",
    )?
    .to_string();

    let download = state.http().get(&request.pdf_url).send().await?;
    if !download.status().is_success() {
        return Err(GatewayError::Upstream {
            status: download.status().as_u16(),
            body: format!("failed to download {}", request.pdf_url),
        });
    }
    let pdf = download.bytes().await?;
    let limit = state.config().limits.max_document_bytes;
    if pdf.len() > limit {
        return Err(GatewayError::Validation(format!(
            "document exceeds the {limit} byte limit"
        )));
    }

    let display_name = if request.original_name.trim().is_empty() {
        "document.pdf"
    } else {
        &request.original_name
    };
    let uploaded = state
        .gemini()
        .upload_file(&api_key, pdf.to_vec(), display_name)
        .await?;

    Ok(json_ok(&json!({
        "success": true,
        "fileUri": uploaded.file_uri,
        "fileName": uploaded.file_name,
    })))
}

fn bad_multipart(err: axum::extract::multipart::MultipartError) -> GatewayError {
    GatewayError::Validation(format!("invalid multipart body: {}", err.body_text()))
}
