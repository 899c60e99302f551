//! xAI Grok client.
//!
//! The upstream call is always `stream: false`; streaming toward the
//! browser is simulated by the synthetic word stream.

use serde::Serialize;
use serde_json::Value;

use super::check_status;
use crate::chat::ChatMessage;
use crate::error::GatewayError;

pub const DEFAULT_MODEL: &str = "grok-3-latest";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    search_parameters: Option<&'a Value>,
}

/// Answer text plus any citation URLs the live search produced.
#[derive(Debug)]
pub struct GrokAnswer {
    pub text: String,
    pub citations: Vec<String>,
}

pub struct GrokClient<'a> {
    pub http: &'a reqwest::Client,
    pub base_url: &'a str,
    pub api_key: &'a str,
}

impl GrokClient<'_> {
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        max_tokens: u32,
        search_parameters: Option<&Value>,
    ) -> Result<GrokAnswer, GatewayError> {
        let default_search = serde_json::json!({
            "mode": "auto",
            "return_citations": true,
        });
        let search = search_parameters.unwrap_or(&default_search);

        let response = self
            .http
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(self.api_key)
            .json(&ChatRequest {
                model: DEFAULT_MODEL,
                messages,
                max_tokens,
                stream: false,
                search_parameters: Some(search),
            })
            .send()
            .await?;
        let response = check_status(response).await?;
        let body: Value = response.json().await?;

        let text = body
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let citations = body
            .get("citations")
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        Ok(GrokAnswer { text, citations })
    }
}
