//! Provider credentials, resolved from the environment once at startup.
//!
//! Every field is optional at load time; a handler whose credential is
//! absent answers 500 without calling upstream. The only sanctioned
//! fallback is the default ElevenLabs voice ID used by the TTS
//! endpoints.

use serde::Deserialize;

use crate::error::GatewayError;

/// Fallback voice when no `ELEVENLABS_VOICE_ID` is configured and the
/// request does not name one.
pub const DEFAULT_VOICE_ID: &str = "XrExE9yKIg1WjnnlVkGX";

/// Environment-derived credential snapshot.
///
/// Deserialize is derived so integration tests can construct a snapshot
/// without touching the process environment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub claude_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub grok_api_key: Option<String>,
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_voice_id: Option<String>,
    pub perplexity_api_key: Option<String>,
    pub serpapi_api_key: Option<String>,
    pub google_api_key: Option<String>,
    pub google_cse_id: Option<String>,
    pub google_project_id: Option<String>,
    /// Base64-encoded service-account JSON.
    pub google_credentials_base64: Option<String>,
    pub google_storage_bucket: Option<String>,
    pub document_ai_location: Option<String>,
    pub document_ai_processor_id: Option<String>,
}

impl Credentials {
    /// Snapshot the process environment.
    pub fn from_env() -> Self {
        fn var(name: &str) -> Option<String> {
            std::env::var(name).ok().filter(|v| !v.is_empty())
        }

        Self {
            claude_api_key: var("CLAUDE_API_KEY"),
            openai_api_key: var("OPENAI_API_KEY"),
            grok_api_key: var("GROK_API_KEY"),
            elevenlabs_api_key: var("ELEVENLABS_API_KEY"),
            elevenlabs_voice_id: var("ELEVENLABS_VOICE_ID"),
            perplexity_api_key: var("PERPLEXITY_API_KEY"),
            serpapi_api_key: var("SERPAPI_API_KEY"),
            google_api_key: var("GOOGLE_API_KEY"),
            google_cse_id: var("GOOGLE_CSE_ID"),
            google_project_id: var("GOOGLE_CLOUD_PROJECT_ID"),
            google_credentials_base64: var("GOOGLE_CREDENTIALS_BASE64"),
            google_storage_bucket: var("GOOGLE_STORAGE_BUCKET"),
            document_ai_location: var("DOCUMENT_AI_LOCATION"),
            document_ai_processor_id: var("DOCUMENT_AI_PROCESSOR_ID"),
        }
    }

    /// Require a credential, naming the environment variable in the
    /// configuration error.
    pub fn require<'a>(
        value: &'a Option<String>,
        var: &str,
    ) -> Result<&'a str, GatewayError> {
        value
            .as_deref()
            .ok_or_else(|| GatewayError::missing_credential(var))
    }

    /// The voice used when neither the request nor the environment
    /// names one.
    pub fn voice_id_or_default(&self, requested: Option<&str>) -> String {
        requested
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .or_else(|| self.elevenlabs_voice_id.clone())
            .unwrap_or_else(|| DEFAULT_VOICE_ID.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_names_the_missing_variable() {
        let err = Credentials::require(&None, "CLAUDE_API_KEY").unwrap_err();
        assert!(err.to_string().contains("CLAUDE_API_KEY"));
    }

    #[test]
    fn voice_fallback_order_is_request_env_default() {
        let mut creds = Credentials::default();
        assert_eq!(creds.voice_id_or_default(None), DEFAULT_VOICE_ID);

        creds.elevenlabs_voice_id = Some("env-voice".into());
        assert_eq!(creds.voice_id_or_default(None), "env-voice");
        assert_eq!(creds.voice_id_or_default(Some("req-voice")), "req-voice");
        assert_eq!(creds.voice_id_or_default(Some("")), "env-voice");
    }
}
