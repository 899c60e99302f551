//! Perplexity Sonar client.
//!
//! Used by the best-effort search endpoints; the handler, not this
//! client, decides whether a failure propagates or is swallowed.

use serde_json::{json, Value};

use super::check_status;
use crate::chat::ChatMessage;
use crate::error::GatewayError;

pub const DEFAULT_MODEL: &str = "sonar";

pub struct PerplexityClient<'a> {
    pub http: &'a reqwest::Client,
    pub base_url: &'a str,
    pub api_key: &'a str,
}

impl PerplexityClient<'_> {
    /// One chat-completions call; the full payload is returned so the
    /// caller can pull both the answer and the citation metadata.
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        recency: Option<&str>,
        max_tokens: u32,
    ) -> Result<Value, GatewayError> {
        let mut body = json!({
            "model": DEFAULT_MODEL,
            "messages": messages,
            "max_tokens": max_tokens,
            "temperature": 0.2,
        });
        if let Some(recency) = recency {
            body["search_recency_filter"] = json!(recency);
        }

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.api_key)
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }
}

/// Answer text of a Perplexity chat payload.
pub fn answer_text(payload: &Value) -> Option<&str> {
    payload
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
}
