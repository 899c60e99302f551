//! ElevenLabs client: text-to-speech and voice conversion.
//!
//! Both endpoints return a binary MPEG stream that the handlers relay
//! unchanged.

use bytes::Bytes;
use serde_json::json;

use super::check_status;
use crate::error::GatewayError;

pub const DEFAULT_TTS_MODEL: &str = "eleven_multilingual_v2";
const SPEECH_TO_SPEECH_MODEL: &str = "eleven_multilingual_sts_v2";

pub struct ElevenLabsClient<'a> {
    pub http: &'a reqwest::Client,
    pub base_url: &'a str,
    pub api_key: &'a str,
}

impl ElevenLabsClient<'_> {
    /// Synthesize speech for `text` with the given voice.
    pub async fn text_to_speech(
        &self,
        voice_id: &str,
        text: &str,
        model_id: &str,
    ) -> Result<Bytes, GatewayError> {
        let body = json!({
            "text": text,
            "model_id": model_id,
            "voice_settings": {
                "stability": 0.5,
                "similarity_boost": 0.75,
            },
        });

        let response = self
            .http
            .post(format!(
                "{}/v1/text-to-speech/{}/stream",
                self.base_url, voice_id
            ))
            .header("xi-api-key", self.api_key)
            .header("accept", "audio/mpeg")
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.bytes().await?)
    }

    /// Convert recorded speech to the target voice.
    pub async fn speech_to_speech(
        &self,
        voice_id: &str,
        audio: Vec<u8>,
        mime_type: &str,
    ) -> Result<Bytes, GatewayError> {
        let part = reqwest::multipart::Part::bytes(audio)
            .file_name("input.webm")
            .mime_str(mime_type)
            .map_err(|e| GatewayError::Validation(format!("invalid audio content type: {e}")))?;
        let form = reqwest::multipart::Form::new()
            .part("audio", part)
            .text("model_id", SPEECH_TO_SPEECH_MODEL);

        let response = self
            .http
            .post(format!(
                "{}/v1/speech-to-speech/{}",
                self.base_url, voice_id
            ))
            .header("xi-api-key", self.api_key)
            .header("accept", "audio/mpeg")
            .multipart(form)
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.bytes().await?)
    }
}
