//! Buffered endpoint mappings: Claude envelope, OpenAI relay, web
//! search flags, Whisper transcription shape.

mod common;

use axum::routing::post;
use axum::{Json, Router};
use reqwest::StatusCode;
use serde_json::{json, Value};

use omnia_gateway::Credentials;

#[tokio::test]
async fn claude_relays_content_model_and_usage() {
    let mock = Router::new().route(
        "/v1/messages",
        post(|| async {
            Json(json!({
                "content": [{"type": "text", "text": "Ahoj, jak mohu pomoci?"}],
                "model": "claude-sonnet-4-20250514",
                "usage": {"input_tokens": 12, "output_tokens": 9},
            }))
        }),
    );
    let upstream = common::spawn_mock(mock).await;

    let mut config = common::fast_config();
    config.upstreams.anthropic_url = upstream;
    let credentials = Credentials {
        claude_api_key: Some("test-key".into()),
        ..Credentials::default()
    };
    let base = common::spawn_gateway(config, credentials).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/claude"))
        .json(&json!({"messages": [{"role": "user", "content": "ahoj"}]}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["content"][0]["text"], "Ahoj, jak mohu pomoci?");
    assert_eq!(body["model"], "claude-sonnet-4-20250514");
    assert_eq!(body["usage"]["input_tokens"], 12);
}

#[tokio::test]
async fn openai_payload_is_relayed_verbatim() {
    let marker = json!({
        "id": "chatcmpl-test",
        "choices": [{"message": {"role": "assistant", "content": "hello"}}],
        "usage": {"total_tokens": 7},
    });
    let payload = marker.clone();
    let mock = Router::new().route(
        "/v1/chat/completions",
        post(move || {
            let payload = payload.clone();
            async move { Json(payload) }
        }),
    );
    let upstream = common::spawn_mock(mock).await;

    let mut config = common::fast_config();
    config.upstreams.openai_url = upstream;
    let credentials = Credentials {
        openai_api_key: Some("test-key".into()),
        ..Credentials::default()
    };
    let base = common::spawn_gateway(config, credentials).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/openai"))
        .json(&json!({"messages": [{"role": "user", "content": "hi"}]}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, marker);
}

#[tokio::test]
async fn upstream_error_status_is_relayed() {
    let mock = Router::new().route(
        "/v1/messages",
        post(|| async { (StatusCode::TOO_MANY_REQUESTS, "rate limited") }),
    );
    let upstream = common::spawn_mock(mock).await;

    let mut config = common::fast_config();
    config.upstreams.anthropic_url = upstream;
    let credentials = Credentials {
        claude_api_key: Some("test-key".into()),
        ..Credentials::default()
    };
    let base = common::spawn_gateway(config, credentials).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/claude"))
        .json(&json!({"messages": [{"role": "user", "content": "q"}]}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn web_search_sets_flag_and_placeholder_source() {
    let mock = Router::new().route(
        "/v1/messages",
        post(|| async {
            Json(json!({
                "content": [
                    {"type": "server_tool_use", "name": "web_search"},
                    {"type": "text", "text": "Aktuální zprávy: ..."}
                ],
                "model": "claude-sonnet-4-20250514",
                "usage": {},
            }))
        }),
    );
    let upstream = common::spawn_mock(mock).await;

    let mut config = common::fast_config();
    config.upstreams.anthropic_url = upstream;
    let credentials = Credentials {
        claude_api_key: Some("test-key".into()),
        ..Credentials::default()
    };
    let base = common::spawn_gateway(config, credentials).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/claude-web-search"))
        .json(&json!({"query": "aktuální zprávy", "language": "cs"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["webSearchUsed"], true);
    assert_eq!(body["result"], "Aktuální zprávy: ...");
    assert_eq!(body["sources"][0]["title"], "Web Search Results");
}

#[tokio::test]
async fn whisper_maps_transcription_fields() {
    let mock = Router::new().route(
        "/v1/audio/transcriptions",
        post(|| async {
            Json(json!({
                "text": "dobrý den",
                "language": "czech",
                "segments": [{"avg_logprob": -0.05}],
            }))
        }),
    );
    let upstream = common::spawn_mock(mock).await;

    let mut config = common::fast_config();
    config.upstreams.openai_url = upstream;
    let credentials = Credentials {
        openai_api_key: Some("test-key".into()),
        ..Credentials::default()
    };
    let base = common::spawn_gateway(config, credentials).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/whisper"))
        .header("content-type", "audio/webm")
        .body(vec![0u8; 128])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["text"], "dobrý den");
    assert_eq!(body["language"], "czech");
    assert!(body["confidence"].as_f64().unwrap() > 0.9);
}

#[tokio::test]
async fn oversized_audio_body_gets_the_json_error_envelope() {
    let mut config = common::fast_config();
    config.limits.max_audio_bytes = 1024;
    let base = common::spawn_gateway(config, Credentials::default()).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/whisper"))
        .header("content-type", "audio/webm")
        .body(vec![0u8; 4096])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("1024"));
}

#[tokio::test]
async fn empty_audio_body_is_rejected() {
    let base =
        common::spawn_gateway(common::fast_config(), Credentials::default()).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/whisper"))
        .header("content-type", "audio/webm")
        .body(Vec::<u8>::new())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
