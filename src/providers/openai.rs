//! OpenAI client: GPT chat completions and Whisper transcription.

use serde::Serialize;
use serde_json::Value;

use super::check_status;
use crate::chat::ChatMessage;
use crate::error::GatewayError;

pub const CHAT_MODEL: &str = "gpt-4o";
const WHISPER_MODEL: &str = "whisper-1";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

/// Whisper transcription mapped to the gateway's shape.
#[derive(Debug)]
pub struct Transcription {
    pub text: String,
    pub language: String,
    pub confidence: f64,
}

pub struct OpenAiClient<'a> {
    pub http: &'a reqwest::Client,
    pub base_url: &'a str,
    pub api_key: &'a str,
}

impl OpenAiClient<'_> {
    /// Chat completion; the upstream JSON is relayed verbatim.
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<Value, GatewayError> {
        let response = self
            .http
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(self.api_key)
            .json(&ChatRequest {
                model: CHAT_MODEL,
                messages,
                temperature,
                max_tokens,
            })
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Whisper transcription of a raw audio buffer.
    ///
    /// `confidence` is derived from the mean segment `avg_logprob` when
    /// the verbose response carries segments, 1.0 otherwise.
    pub async fn transcribe(
        &self,
        audio: Vec<u8>,
        file_name: &str,
        mime_type: &str,
    ) -> Result<Transcription, GatewayError> {
        let part = reqwest::multipart::Part::bytes(audio)
            .file_name(file_name.to_string())
            .mime_str(mime_type)
            .map_err(|e| GatewayError::Validation(format!("invalid audio content type: {e}")))?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", WHISPER_MODEL)
            .text("response_format", "verbose_json");

        let response = self
            .http
            .post(format!("{}/v1/audio/transcriptions", self.base_url))
            .bearer_auth(self.api_key)
            .multipart(form)
            .send()
            .await?;
        let response = check_status(response).await?;
        let body: Value = response.json().await?;

        Ok(Transcription {
            text: body
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            language: body
                .get("language")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string(),
            confidence: confidence_from_segments(&body),
        })
    }
}

fn confidence_from_segments(body: &Value) -> f64 {
    let Some(segments) = body.get("segments").and_then(Value::as_array) else {
        return 1.0;
    };
    let logprobs: Vec<f64> = segments
        .iter()
        .filter_map(|s| s.get("avg_logprob").and_then(Value::as_f64))
        .collect();
    if logprobs.is_empty() {
        return 1.0;
    }
    let mean = logprobs.iter().sum::<f64>() / logprobs.len() as f64;
    mean.exp().clamp(0.0, 1.0)
}
