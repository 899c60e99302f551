//! Audio endpoints: ElevenLabs TTS and voice conversion, Google TTS with
//! Czech number expansion, Whisper transcription.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::Response;
use serde::Deserialize;
use serde_json::json;

use super::{require_text, ApiJson};
use crate::error::GatewayError;
use crate::http::response::{audio_response, json_ok};
use crate::http::server::AppState;
use crate::providers::elevenlabs::DEFAULT_TTS_MODEL;
use crate::providers::google_tts::voice_for_language;
use crate::text::{detect_language, expand_for_speech, Language};

#[derive(Deserialize)]
pub struct TtsRequest {
    #[serde(default)]
    pub text: String,
    pub voice_id: Option<String>,
    pub model_id: Option<String>,
    pub language: Option<String>,
    pub voice: Option<String>,
}

/// `POST /api/elevenlabs-tts`
pub async fn elevenlabs_tts(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<TtsRequest>,
) -> Result<Response, GatewayError> {
    require_text(&request.text, "text")?;
    let voice_id = state
        .credentials()
        .voice_id_or_default(request.voice_id.as_deref());
    let model_id = request.model_id.as_deref().unwrap_or(DEFAULT_TTS_MODEL);

    let audio = state
        .elevenlabs()?
        .text_to_speech(&voice_id, &request.text, model_id)
        .await?;
    Ok(audio_response(audio))
}

/// `POST /api/voice` - alias of the ElevenLabs synthesis with the
/// default multilingual model pinned.
pub async fn voice(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<TtsRequest>,
) -> Result<Response, GatewayError> {
    require_text(&request.text, "text")?;
    let voice_id = state
        .credentials()
        .voice_id_or_default(request.voice_id.as_deref());

    let audio = state
        .elevenlabs()?
        .text_to_speech(&voice_id, &request.text, DEFAULT_TTS_MODEL)
        .await?;
    Ok(audio_response(audio))
}

/// `POST /api/google-tts`
///
/// Czech text is run through the number/time/ordinal expansion first;
/// the synthesis engine reads digits in Czech badly enough that "14:30"
/// must arrive as words.
pub async fn google_tts(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<TtsRequest>,
) -> Result<Response, GatewayError> {
    require_text(&request.text, "text")?;
    let language = detect_language(request.language.as_deref(), &request.text);

    let text = if language == Language::Czech {
        expand_for_speech(&request.text)
    } else {
        request.text.clone()
    };

    let (default_code, default_voice) = voice_for_language(language.code());
    let voice_name = request.voice.as_deref().unwrap_or(default_voice);

    let audio = state
        .google_tts()?
        .synthesize(&text, default_code, voice_name)
        .await?;
    Ok(audio_response(audio))
}

/// `POST /api/voice-to-voice` - raw audio in, converted audio out.
pub async fn voice_to_voice(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, GatewayError> {
    let audio = read_audio_body(&state, &body)?;
    let mime = content_type(&headers).unwrap_or("audio/webm");
    let voice_id = state.credentials().voice_id_or_default(None);

    let converted = state
        .elevenlabs()?
        .speech_to_speech(&voice_id, audio, mime)
        .await?;
    Ok(audio_response(converted))
}

/// `POST /api/whisper` - raw audio in, transcription out.
pub async fn whisper(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, GatewayError> {
    let audio = read_audio_body(&state, &body)?;
    let mime = content_type(&headers).unwrap_or("audio/webm");

    let transcription = state
        .openai()?
        .transcribe(audio, "recording.webm", mime)
        .await?;

    Ok(json_ok(&json!({
        "success": true,
        "text": transcription.text,
        "language": transcription.language,
        "confidence": transcription.confidence,
    })))
}

fn read_audio_body(state: &AppState, body: &Bytes) -> Result<Vec<u8>, GatewayError> {
    if body.is_empty() {
        return Err(GatewayError::Validation("audio body is required".into()));
    }
    if body.len() > state.config().limits.max_audio_bytes {
        return Err(GatewayError::Validation(format!(
            "audio exceeds the {} byte limit",
            state.config().limits.max_audio_bytes
        )));
    }
    Ok(body.to_vec())
}

fn content_type(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
}
