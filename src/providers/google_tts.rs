//! Google Cloud Text-to-Speech client.

use base64::Engine;
use bytes::Bytes;
use serde_json::{json, Value};

use super::check_status;
use crate::error::GatewayError;

/// Voice used when the request names neither a voice nor a language.
pub fn voice_for_language(language: &str) -> (&'static str, &'static str) {
    match language {
        "cs" => ("cs-CZ", "cs-CZ-Wavenet-A"),
        "ro" => ("ro-RO", "ro-RO-Wavenet-A"),
        "sk" => ("sk-SK", "sk-SK-Wavenet-A"),
        "de" => ("de-DE", "de-DE-Wavenet-B"),
        _ => ("en-US", "en-US-Wavenet-D"),
    }
}

pub struct GoogleTtsClient<'a> {
    pub http: &'a reqwest::Client,
    pub base_url: &'a str,
    pub api_key: &'a str,
}

impl GoogleTtsClient<'_> {
    /// Synthesize MP3 audio; the base64 `audioContent` is decoded here
    /// so handlers can relay raw `audio/mpeg` bytes.
    pub async fn synthesize(
        &self,
        text: &str,
        language_code: &str,
        voice_name: &str,
    ) -> Result<Bytes, GatewayError> {
        let body = json!({
            "input": {"text": text},
            "voice": {"languageCode": language_code, "name": voice_name},
            "audioConfig": {"audioEncoding": "MP3", "speakingRate": 1.0},
        });

        let response = self
            .http
            .post(format!("{}/v1/text:synthesize", self.base_url))
            .query(&[("key", self.api_key)])
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;
        let payload: Value = response.json().await?;

        let audio = payload
            .get("audioContent")
            .and_then(Value::as_str)
            .ok_or_else(|| GatewayError::Upstream {
                status: 502,
                body: "synthesis response missing audioContent".into(),
            })?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(audio)
            .map_err(|e| GatewayError::Upstream {
                status: 502,
                body: format!("audioContent is not valid base64: {e}"),
            })?;
        Ok(Bytes::from(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn czech_maps_to_czech_wavenet() {
        assert_eq!(voice_for_language("cs"), ("cs-CZ", "cs-CZ-Wavenet-A"));
    }

    #[test]
    fn unknown_language_falls_back_to_english() {
        assert_eq!(voice_for_language("xx").0, "en-US");
    }
}
