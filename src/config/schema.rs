//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! gateway. All types derive Serde traits for deserialization from
//! config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request body size limits.
    pub limits: LimitsConfig,

    /// Simulated-streaming pacing.
    pub streaming: StreamingConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Upstream provider base URLs.
    pub upstreams: UpstreamConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total inbound request timeout in seconds. Streaming chat
    /// responses can legitimately run for minutes.
    pub request_secs: u64,

    /// Timeout for a single upstream call in seconds.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 300,
            upstream_secs: 120,
        }
    }
}

/// Body size limits per endpoint family, in bytes.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// JSON API bodies.
    pub max_json_bytes: usize,

    /// Raw audio uploads (voice-to-voice, whisper).
    pub max_audio_bytes: usize,

    /// Document uploads (process-document).
    pub max_document_bytes: usize,

    /// Declared file size accepted by the signed-URL generator.
    pub max_signed_upload_bytes: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_json_bytes: 2 * 1024 * 1024,
            max_audio_bytes: 25 * 1024 * 1024,
            max_document_bytes: 25 * 1024 * 1024,
            max_signed_upload_bytes: 50 * 1024 * 1024,
        }
    }
}

/// Pacing of the synthetic word stream.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Artificial delay between word frames in milliseconds.
    pub word_delay_ms: u64,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self { word_delay_ms: 8 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Base URLs of every upstream provider.
///
/// Defaults are the production endpoints; integration tests override
/// them to point at mock servers.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub anthropic_url: String,
    pub openai_url: String,
    pub gemini_url: String,
    pub grok_url: String,
    pub elevenlabs_url: String,
    pub perplexity_url: String,
    pub google_tts_url: String,
    pub customsearch_url: String,
    pub serpapi_url: String,
    /// `{location}` is substituted with `DOCUMENT_AI_LOCATION`.
    pub documentai_url: String,
    pub storage_url: String,
    pub iam_url: String,
    pub oauth_token_url: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            anthropic_url: "https://api.anthropic.com".to_string(),
            openai_url: "https://api.openai.com".to_string(),
            gemini_url: "https://generativelanguage.googleapis.com".to_string(),
            grok_url: "https://api.x.ai".to_string(),
            elevenlabs_url: "https://api.elevenlabs.io".to_string(),
            perplexity_url: "https://api.perplexity.ai".to_string(),
            google_tts_url: "https://texttospeech.googleapis.com".to_string(),
            customsearch_url: "https://www.googleapis.com".to_string(),
            serpapi_url: "https://serpapi.com".to_string(),
            documentai_url: "https://{location}-documentai.googleapis.com".to_string(),
            storage_url: "https://storage.googleapis.com".to_string(),
            iam_url: "https://iamcredentials.googleapis.com".to_string(),
            oauth_token_url: "https://oauth2.googleapis.com/token".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_full_defaults() {
        let config: GatewayConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.streaming.word_delay_ms, 8);
        assert_eq!(config.limits.max_audio_bytes, 25 * 1024 * 1024);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: GatewayConfig =
            toml::from_str("[streaming]\nword_delay_ms = 15\n").unwrap();
        assert_eq!(config.streaming.word_delay_ms, 15);
        assert_eq!(config.timeouts.upstream_secs, 120);
    }
}
