//! Chat endpoints: Claude (buffered and streaming), OpenAI, Gemini, Grok.

use std::time::Duration;

use axum::extract::State;
use axum::response::Response;
use serde::Deserialize;
use serde_json::{json, Value};

use super::ApiJson;
use crate::chat::{normalize_messages, ChatMessage, Role};
use crate::error::GatewayError;
use crate::http::response::json_ok;
use crate::http::server::AppState;
use crate::sources;
use crate::stream::{
    streaming_response, StreamSource, SyntheticWordStream, UpstreamEventStream, WireFormat,
};
use crate::text::detect_language;

#[derive(Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    pub system: Option<String>,
    pub max_tokens: Option<u32>,
    pub language: Option<String>,
    pub search_parameters: Option<Value>,
    pub temperature: Option<f32>,
}

const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Split an inline system turn out of the history; an explicit `system`
/// field wins over one embedded in `messages`.
fn split_system(
    messages: Vec<ChatMessage>,
    explicit: Option<String>,
) -> (Option<String>, Vec<ChatMessage>) {
    let mut system = explicit;
    let mut rest = Vec::with_capacity(messages.len());
    for message in messages {
        if message.role == Role::System {
            if system.is_none() {
                system = Some(message.content);
            }
        } else {
            rest.push(message);
        }
    }
    (system, rest)
}

fn prepare(request: &mut ChatRequest) -> Result<(Option<String>, Vec<ChatMessage>), GatewayError> {
    if request.messages.is_empty() {
        return Err(GatewayError::Validation("messages are required".into()));
    }
    let (system, rest) = split_system(std::mem::take(&mut request.messages), request.system.take());
    let normalized = normalize_messages(rest);
    if normalized.is_empty() {
        return Err(GatewayError::Validation(
            "messages must contain at least one user turn".into(),
        ));
    }
    Ok((system, normalized))
}

/// Last user turn, used by the language heuristic.
fn last_user_text(messages: &[ChatMessage]) -> &str {
    messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
        .unwrap_or_default()
}

/// Append an answer-language instruction to the system prompt.
fn with_language_hint(system: Option<String>, language: Option<&str>) -> Option<String> {
    let instruction = match language {
        Some(code) if code.starts_with("cs") => "Odpovídej vždy česky.",
        Some(code) if code.starts_with("ro") => "Răspunde întotdeauna în română.",
        Some(code) if code.starts_with("en") => "Always answer in English.",
        _ => return system,
    };
    Some(match system {
        Some(system) => format!("{system}\n\n{instruction}"),
        None => instruction.to_string(),
    })
}

fn word_delay(state: &AppState) -> Duration {
    Duration::from_millis(state.config().streaming.word_delay_ms)
}

/// `POST /api/claude` - buffered Anthropic messages call.
pub async fn claude(
    State(state): State<AppState>,
    ApiJson(mut request): ApiJson<ChatRequest>,
) -> Result<Response, GatewayError> {
    let (system, messages) = prepare(&mut request)?;
    let max_tokens = request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS);

    let answer = state
        .claude()?
        .messages(&messages, system.as_deref(), max_tokens)
        .await?;

    Ok(json_ok(&json!({
        "success": true,
        "content": answer.content,
        "model": answer.model,
        "usage": answer.usage,
    })))
}

/// `POST /api/claude2` - true streaming, SSE out.
pub async fn claude2(
    State(state): State<AppState>,
    ApiJson(mut request): ApiJson<ChatRequest>,
) -> Result<Response, GatewayError> {
    let (system, messages) = prepare(&mut request)?;
    let system = with_language_hint(system, request.language.as_deref());
    let max_tokens = request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS);

    let upstream = state
        .claude()?
        .messages_stream(&messages, system.as_deref(), max_tokens)
        .await?;

    let (response, sink) = streaming_response(WireFormat::Sse);
    let source = StreamSource::Upstream(UpstreamEventStream::new(upstream.bytes_stream()));
    tokio::spawn(source.produce(sink));
    Ok(response)
}

/// `POST /api/openai` - chat completion relayed verbatim.
pub async fn openai(
    State(state): State<AppState>,
    ApiJson(mut request): ApiJson<ChatRequest>,
) -> Result<Response, GatewayError> {
    if request.messages.is_empty() {
        return Err(GatewayError::Validation("messages are required".into()));
    }
    let messages = normalize_messages(std::mem::take(&mut request.messages));
    let temperature = request.temperature.unwrap_or(0.7);
    let max_tokens = request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS);

    let payload = state
        .openai()?
        .chat(&messages, temperature, max_tokens)
        .await?;
    Ok(json_ok(&payload))
}

/// `POST /api/gemini` - grounded generation, NDJSON frames out.
pub async fn gemini(
    State(state): State<AppState>,
    ApiJson(mut request): ApiJson<ChatRequest>,
) -> Result<Response, GatewayError> {
    let (system, messages) = prepare(&mut request)?;
    let max_tokens = request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS);
    let language = detect_language(request.language.as_deref(), last_user_text(&messages));

    let token = state.google_access_token().await?;
    let answer = state
        .gemini()
        .generate_grounded(&token, &messages, system.as_deref(), max_tokens)
        .await?;

    let extracted = answer
        .grounding
        .as_ref()
        .map(sources::from_gemini_grounding)
        .unwrap_or_default();

    let (response, sink) = streaming_response(WireFormat::Ndjson);
    let source = StreamSource::Synthetic(
        SyntheticWordStream::new(answer.text)
            .with_sources(extracted, language.search_notice())
            .with_word_delay(word_delay(&state)),
    );
    tokio::spawn(source.produce(sink));
    Ok(response)
}

/// `POST /api/grok` - buffered upstream, NDJSON frames out.
pub async fn grok(
    State(state): State<AppState>,
    ApiJson(mut request): ApiJson<ChatRequest>,
) -> Result<Response, GatewayError> {
    let (system, mut messages) = prepare(&mut request)?;
    if let Some(system) = system {
        messages.insert(
            0,
            ChatMessage {
                role: Role::System,
                content: system,
            },
        );
    }
    let max_tokens = request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS);
    let language = detect_language(request.language.as_deref(), last_user_text(&messages));

    let answer = state
        .grok()?
        .chat(&messages, max_tokens, request.search_parameters.as_ref())
        .await?;
    let extracted = sources::from_citation_urls(&answer.citations);

    let (response, sink) = streaming_response(WireFormat::Ndjson);
    let source = StreamSource::Synthetic(
        SyntheticWordStream::new(answer.text)
            .with_sources(extracted, language.search_notice())
            .with_word_delay(word_delay(&state)),
    );
    tokio::spawn(source.produce(sink));
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_system_wins_over_inline_turn() {
        let messages = vec![
            ChatMessage {
                role: Role::System,
                content: "inline".into(),
            },
            ChatMessage::user("q"),
        ];
        let (system, rest) = split_system(messages, Some("explicit".into()));
        assert_eq!(system.as_deref(), Some("explicit"));
        assert_eq!(rest, vec![ChatMessage::user("q")]);
    }

    #[test]
    fn inline_system_turn_is_extracted() {
        let messages = vec![
            ChatMessage {
                role: Role::System,
                content: "be brief".into(),
            },
            ChatMessage::user("q"),
        ];
        let (system, rest) = split_system(messages, None);
        assert_eq!(system.as_deref(), Some("be brief"));
        assert_eq!(rest.len(), 1);
    }

    #[test]
    fn language_hint_is_appended() {
        let system = with_language_hint(Some("You are Omnia.".into()), Some("cs"));
        let system = system.unwrap();
        assert!(system.starts_with("You are Omnia."));
        assert!(system.ends_with("Odpovídej vždy česky."));
        assert_eq!(with_language_hint(None, Some("xx")), None);
    }
}
