//! Google Document AI client (OCR / text extraction).

use base64::Engine;
use serde_json::{json, Value};

use super::check_status;
use crate::error::GatewayError;

/// Extracted document contents.
#[derive(Debug)]
pub struct ExtractedDocument {
    pub text: String,
    pub page_count: usize,
}

pub struct DocumentAiClient<'a> {
    pub http: &'a reqwest::Client,
    /// Template with a `{location}` placeholder.
    pub base_url_template: &'a str,
    pub project_id: &'a str,
    pub location: &'a str,
    pub processor_id: &'a str,
}

impl DocumentAiClient<'_> {
    /// Process an in-memory document.
    pub async fn process_raw(
        &self,
        access_token: &str,
        bytes: &[u8],
        mime_type: &str,
    ) -> Result<ExtractedDocument, GatewayError> {
        let body = json!({
            "rawDocument": {
                "content": base64::engine::general_purpose::STANDARD.encode(bytes),
                "mimeType": mime_type,
            },
        });
        self.process(access_token, body).await
    }

    /// Process a document already uploaded to Cloud Storage.
    pub async fn process_gcs(
        &self,
        access_token: &str,
        gcs_uri: &str,
        mime_type: &str,
    ) -> Result<ExtractedDocument, GatewayError> {
        let body = json!({
            "gcsDocument": {
                "gcsUri": gcs_uri,
                "mimeType": mime_type,
            },
        });
        self.process(access_token, body).await
    }

    async fn process(
        &self,
        access_token: &str,
        body: Value,
    ) -> Result<ExtractedDocument, GatewayError> {
        let base = self.base_url_template.replace("{location}", self.location);
        let url = format!(
            "{}/v1/projects/{}/locations/{}/processors/{}:process",
            base, self.project_id, self.location, self.processor_id
        );

        let response = self
            .http
            .post(url)
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;
        let payload: Value = response.json().await?;

        let document = payload.get("document").cloned().unwrap_or(Value::Null);
        Ok(ExtractedDocument {
            text: document
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            page_count: document
                .get("pages")
                .and_then(Value::as_array)
                .map(|p| p.len())
                .unwrap_or(0),
        })
    }
}
