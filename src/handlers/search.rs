//! Search endpoints: Claude web search, Perplexity Sonar, Google Custom
//! Search and SerpAPI news.

use axum::extract::State;
use axum::response::Response;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{require_text, ApiJson};
use crate::chat::ChatMessage;
use crate::error::GatewayError;
use crate::http::response::json_ok;
use crate::http::server::AppState;
use crate::providers::perplexity;
use crate::sources::{self, Source};
use crate::text::{detect_language, has_repeating_pattern, Language};

const SEARCH_MAX_TOKENS: u32 = 2048;
const SONAR_RECENCY: &str = "week";

#[derive(Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    pub language: Option<String>,
    pub recency: Option<String>,
    pub num: Option<u32>,
}

#[derive(Deserialize)]
pub struct NewsRequest {
    pub query: Option<String>,
    pub country: Option<String>,
}

/// `POST /api/claude-web-search` - Anthropic server-side web search.
pub async fn claude_web_search(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SearchRequest>,
) -> Result<Response, GatewayError> {
    require_text(&request.query, "query")?;
    let language = detect_language(request.language.as_deref(), &request.query);
    let system = search_system_prompt(language);

    let answer = state
        .claude()?
        .messages_with_web_search(
            &[ChatMessage::user(request.query)],
            Some(&system),
            SEARCH_MAX_TOKENS,
        )
        .await?;

    let web_search_used = answer.used_web_search();
    let sources: Vec<Source> = if web_search_used {
        sources::web_search_placeholder()
    } else {
        Vec::new()
    };

    Ok(json_ok(&json!({
        "success": true,
        "result": answer.text(),
        "sources": sources,
        "webSearchUsed": web_search_used,
        "model": answer.model,
        "usage": answer.usage,
    })))
}

/// `POST /api/sonar-search` - best-effort Perplexity search.
///
/// Past the credential check this endpoint never fails: upstream errors,
/// malformed payloads and degenerate repeating answers all collapse into
/// a 200 with a language-appropriate apology, because the frontend reads
/// the result aloud and an error JSON in the speech pipeline is worse
/// than an apology.
pub async fn sonar_search(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SearchRequest>,
) -> Result<Response, GatewayError> {
    require_text(&request.query, "query")?;
    let client = state.perplexity()?;
    let language = detect_language(request.language.as_deref(), &request.query);

    let messages = [
        ChatMessage {
            role: crate::chat::Role::System,
            content: search_system_prompt(language),
        },
        ChatMessage::user(request.query),
    ];

    let (result, sources) = match client
        .chat(&messages, Some(SONAR_RECENCY), SEARCH_MAX_TOKENS)
        .await
    {
        Ok(payload) => match perplexity::answer_text(&payload) {
            Some(text) if !text.trim().is_empty() && !has_repeating_pattern(text) => {
                (text.to_string(), sources::from_perplexity(&payload))
            }
            Some(text) if has_repeating_pattern(text) => {
                tracing::warn!("sonar answer degenerated into repetition, substituting apology");
                (language.search_apology().to_string(), Vec::new())
            }
            _ => {
                tracing::warn!("sonar payload carried no answer text");
                (language.search_apology().to_string(), Vec::new())
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "sonar search failed, substituting apology");
            (language.search_apology().to_string(), Vec::new())
        }
    };

    Ok(json_ok(&json!({
        "success": true,
        "result": result,
        "sources": sources,
    })))
}

/// `POST /api/perplexity-search` - plain Perplexity relay; failures
/// propagate, unlike the sonar endpoint.
pub async fn perplexity_search(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SearchRequest>,
) -> Result<Response, GatewayError> {
    require_text(&request.query, "query")?;

    let payload = state
        .perplexity()?
        .chat(
            &[ChatMessage::user(request.query)],
            request.recency.as_deref(),
            SEARCH_MAX_TOKENS,
        )
        .await?;

    let result = perplexity::answer_text(&payload).unwrap_or_default();
    let citations = payload
        .get("citations")
        .cloned()
        .unwrap_or_else(|| Value::Array(Vec::new()));

    Ok(json_ok(&json!({
        "success": true,
        "result": result,
        "citations": citations,
    })))
}

/// `POST /api/google-search` - Custom Search JSON API.
pub async fn google_search(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SearchRequest>,
) -> Result<Response, GatewayError> {
    require_text(&request.query, "query")?;

    let results = state
        .google_search()?
        .search(&request.query, request.num.unwrap_or(5))
        .await?;

    Ok(json_ok(&json!({
        "success": true,
        "results": results,
    })))
}

/// `POST /api/news` - SerpAPI Google News headlines.
pub async fn news(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<NewsRequest>,
) -> Result<Response, GatewayError> {
    let country = request.country.as_deref().unwrap_or("cz");

    let results = state
        .serpapi()?
        .news(request.query.as_deref(), country, 10)
        .await?;

    Ok(json_ok(&json!({
        "success": true,
        "results": results,
    })))
}

/// Search answers are read aloud, so the prompt forbids markdown and
/// pins the answer language.
fn search_system_prompt(language: Language) -> String {
    let instruction = match language {
        Language::Czech => "Odpovídej česky.",
        Language::Romanian => "Răspunde în română.",
        Language::English => "Answer in English.",
    };
    format!(
        "You are a search assistant. Answer concisely in plain sentences \
         without markdown formatting. {instruction}"
    )
}
