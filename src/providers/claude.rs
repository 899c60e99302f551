//! Anthropic Claude client (`/v1/messages`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::check_status;
use crate::chat::ChatMessage;
use crate::error::GatewayError;

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const WEB_SEARCH_TOOL: &str = "web_search_20250305";

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Value>,
}

/// Response of a non-streaming `/v1/messages` call; content blocks and
/// usage are relayed to the caller as-is.
#[derive(Debug, Deserialize)]
pub struct MessagesResponse {
    pub content: Vec<Value>,
    pub model: String,
    #[serde(default)]
    pub usage: Value,
}

impl MessagesResponse {
    /// Concatenated text of all `text` content blocks.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter(|block| block.get("type").and_then(Value::as_str) == Some("text"))
            .filter_map(|block| block.get("text").and_then(Value::as_str))
            .collect()
    }

    /// Whether the server-side web-search tool ran.
    pub fn used_web_search(&self) -> bool {
        self.content
            .iter()
            .any(|block| block.get("type").and_then(Value::as_str) == Some("server_tool_use"))
    }
}

pub struct ClaudeClient<'a> {
    pub http: &'a reqwest::Client,
    pub base_url: &'a str,
    pub api_key: &'a str,
}

impl ClaudeClient<'_> {
    /// One non-streaming messages call.
    pub async fn messages(
        &self,
        messages: &[ChatMessage],
        system: Option<&str>,
        max_tokens: u32,
    ) -> Result<MessagesResponse, GatewayError> {
        let response = self
            .request(&MessagesRequest {
                model: DEFAULT_MODEL,
                max_tokens,
                messages,
                system,
                stream: false,
                tools: None,
            })
            .await?;
        Ok(response.json().await?)
    }

    /// Streaming messages call; the raw SSE response is handed to the
    /// stream translator.
    pub async fn messages_stream(
        &self,
        messages: &[ChatMessage],
        system: Option<&str>,
        max_tokens: u32,
    ) -> Result<reqwest::Response, GatewayError> {
        self.request(&MessagesRequest {
            model: DEFAULT_MODEL,
            max_tokens,
            messages,
            system,
            stream: true,
            tools: None,
        })
        .await
    }

    /// Messages call with the server-side web-search tool enabled.
    pub async fn messages_with_web_search(
        &self,
        messages: &[ChatMessage],
        system: Option<&str>,
        max_tokens: u32,
    ) -> Result<MessagesResponse, GatewayError> {
        let tools = serde_json::json!([{
            "type": WEB_SEARCH_TOOL,
            "name": "web_search",
            "max_uses": 3,
        }]);
        let response = self
            .request(&MessagesRequest {
                model: DEFAULT_MODEL,
                max_tokens,
                messages,
                system,
                stream: false,
                tools: Some(tools),
            })
            .await?;
        Ok(response.json().await?)
    }

    async fn request(
        &self,
        body: &MessagesRequest<'_>,
    ) -> Result<reqwest::Response, GatewayError> {
        let response = self
            .http
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(body)
            .send()
            .await?;
        check_status(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_concatenates_text_blocks_only() {
        let response = MessagesResponse {
            content: vec![
                json!({"type": "text", "text": "Ahoj"}),
                json!({"type": "server_tool_use", "name": "web_search"}),
                json!({"type": "text", "text": " světe"}),
            ],
            model: DEFAULT_MODEL.into(),
            usage: Value::Null,
        };
        assert_eq!(response.text(), "Ahoj světe");
        assert!(response.used_web_search());
    }

    #[test]
    fn stream_flag_is_omitted_when_false() {
        let body = MessagesRequest {
            model: DEFAULT_MODEL,
            max_tokens: 1000,
            messages: &[],
            system: None,
            stream: false,
            tools: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("stream").is_none());
        assert!(json.get("system").is_none());
    }
}
