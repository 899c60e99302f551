//! Google Gemini client: grounded chat, image generation, Files API.
//!
//! Chat uses the OAuth service-account flow (bearer token) with the
//! `google_search` tool enabled for grounding; image generation and the
//! Files API authenticate with the plain API key.

use serde_json::{json, Value};

use super::check_status;
use crate::chat::{ChatMessage, Role};
use crate::error::GatewayError;

pub const CHAT_MODEL: &str = "gemini-2.5-flash";
pub const IMAGE_MODEL: &str = "gemini-2.0-flash-exp";

/// Poll attempts for an uploaded file to become ACTIVE.
const FILE_POLL_ATTEMPTS: u32 = 10;
const FILE_POLL_INTERVAL: std::time::Duration = std::time::Duration::from_secs(1);

/// Grounded answer: full text plus raw grounding metadata.
#[derive(Debug)]
pub struct GeminiAnswer {
    pub text: String,
    pub grounding: Option<Value>,
}

/// One generated image, inline base64.
#[derive(Debug)]
pub struct GeneratedImage {
    pub base64: String,
    pub mime_type: String,
}

/// Uploaded file reference from the Files API.
#[derive(Debug)]
pub struct UploadedFile {
    pub file_uri: String,
    pub file_name: String,
}

pub struct GeminiClient<'a> {
    pub http: &'a reqwest::Client,
    pub base_url: &'a str,
}

impl GeminiClient<'_> {
    /// `generateContent` with search grounding, authenticated by OAuth
    /// bearer token.
    pub async fn generate_grounded(
        &self,
        access_token: &str,
        messages: &[ChatMessage],
        system: Option<&str>,
        max_tokens: u32,
    ) -> Result<GeminiAnswer, GatewayError> {
        let contents: Vec<Value> = messages
            .iter()
            .map(|m| {
                json!({
                    "role": match m.role {
                        Role::Assistant => "model",
                        _ => "user",
                    },
                    "parts": [{"text": m.content}],
                })
            })
            .collect();

        let mut body = json!({
            "contents": contents,
            "tools": [{"google_search": {}}],
            "generationConfig": {
                "maxOutputTokens": max_tokens,
                "temperature": 0.7,
            },
        });
        if let Some(system) = system {
            body["systemInstruction"] = json!({"parts": [{"text": system}]});
        }

        let response = self
            .http
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, CHAT_MODEL
            ))
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;
        let payload: Value = response.json().await?;

        let candidate = payload
            .pointer("/candidates/0")
            .cloned()
            .unwrap_or(Value::Null);
        let text = candidate
            .pointer("/content/parts")
            .and_then(Value::as_array)
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p.get("text").and_then(Value::as_str))
                    .collect::<String>()
            })
            .unwrap_or_default();
        let grounding = candidate.get("groundingMetadata").cloned();

        Ok(GeminiAnswer { text, grounding })
    }

    /// Generate up to `count` images for a prompt (API-key auth).
    pub async fn generate_images(
        &self,
        api_key: &str,
        prompt: &str,
        count: u32,
    ) -> Result<Vec<GeneratedImage>, GatewayError> {
        let mut images = Vec::new();

        // The model returns one image per call; issue `count` calls.
        for _ in 0..count {
            let body = json!({
                "contents": [{"parts": [{"text": prompt}]}],
                "generationConfig": {
                    "responseModalities": ["TEXT", "IMAGE"],
                },
            });
            let response = self
                .http
                .post(format!(
                    "{}/v1beta/models/{}:generateContent?key={}",
                    self.base_url, IMAGE_MODEL, api_key
                ))
                .json(&body)
                .send()
                .await?;
            let response = check_status(response).await?;
            let payload: Value = response.json().await?;

            let parts = payload
                .pointer("/candidates/0/content/parts")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            for part in parts {
                if let Some(inline) = part.get("inlineData") {
                    let data = inline.get("data").and_then(Value::as_str).unwrap_or("");
                    let mime = inline
                        .get("mimeType")
                        .and_then(Value::as_str)
                        .unwrap_or("image/png");
                    if !data.is_empty() {
                        images.push(GeneratedImage {
                            base64: data.to_string(),
                            mime_type: mime.to_string(),
                        });
                    }
                }
            }
        }

        if images.is_empty() {
            return Err(GatewayError::Upstream {
                status: 502,
                body: "image model returned no inline image data".into(),
            });
        }
        Ok(images)
    }

    /// Resumable upload of a PDF to the Files API, polled until ACTIVE.
    pub async fn upload_file(
        &self,
        api_key: &str,
        bytes: Vec<u8>,
        display_name: &str,
    ) -> Result<UploadedFile, GatewayError> {
        let byte_len = bytes.len();

        // Start the resumable session.
        let start = self
            .http
            .post(format!("{}/upload/v1beta/files?key={}", self.base_url, api_key))
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", byte_len.to_string())
            .header("X-Goog-Upload-Header-Content-Type", "application/pdf")
            .json(&json!({"file": {"display_name": display_name}}))
            .send()
            .await?;
        let start = check_status(start).await?;

        let upload_url = start
            .headers()
            .get("x-goog-upload-url")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| GatewayError::Upstream {
                status: 502,
                body: "resumable upload session missing upload URL".into(),
            })?
            .to_string();

        // Upload and finalize in one shot.
        let finalize = self
            .http
            .post(&upload_url)
            .header("X-Goog-Upload-Command", "upload, finalize")
            .header("X-Goog-Upload-Offset", "0")
            .body(bytes)
            .send()
            .await?;
        let finalize = check_status(finalize).await?;
        let payload: Value = finalize.json().await?;

        let file_uri = payload
            .pointer("/file/uri")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let file_name = payload
            .pointer("/file/name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let mut state = payload
            .pointer("/file/state")
            .and_then(Value::as_str)
            .unwrap_or("PROCESSING")
            .to_string();

        // Wait (bounded) for processing to finish.
        let mut attempts = 0;
        while state == "PROCESSING" && attempts < FILE_POLL_ATTEMPTS {
            tokio::time::sleep(FILE_POLL_INTERVAL).await;
            attempts += 1;
            let poll = self
                .http
                .get(format!("{}/v1beta/{}?key={}", self.base_url, file_name, api_key))
                .send()
                .await?;
            let poll = check_status(poll).await?;
            let status: Value = poll.json().await?;
            state = status
                .get("state")
                .and_then(Value::as_str)
                .unwrap_or("PROCESSING")
                .to_string();
        }

        if state == "FAILED" {
            return Err(GatewayError::Upstream {
                status: 502,
                body: "file processing failed upstream".into(),
            });
        }

        Ok(UploadedFile {
            file_uri,
            file_name,
        })
    }
}
