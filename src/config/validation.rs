//! Configuration validation.
//!
//! Semantic checks on top of serde's syntactic ones. Returns all
//! violations, not just the first.

use std::net::SocketAddr;

use crate::config::schema::GatewayConfig;

/// One semantic violation, human readable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validate a configuration. Pure function; runs before the config is
/// accepted into the system.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError(format!(
            "listener.bind_address '{}' is not a valid socket address",
            config.listener.bind_address
        )));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError(format!(
            "observability.metrics_address '{}' is not a valid socket address",
            config.observability.metrics_address
        )));
    }

    if config.timeouts.request_secs == 0 || config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError("timeouts must be greater than zero".into()));
    }

    if !(1..=1000).contains(&config.streaming.word_delay_ms) {
        errors.push(ValidationError(format!(
            "streaming.word_delay_ms {} out of range 1..=1000",
            config.streaming.word_delay_ms
        )));
    }

    if config.limits.max_json_bytes == 0
        || config.limits.max_audio_bytes == 0
        || config.limits.max_document_bytes == 0
    {
        errors.push(ValidationError("limits must be greater than zero".into()));
    }

    for (name, base) in [
        ("anthropic_url", &config.upstreams.anthropic_url),
        ("openai_url", &config.upstreams.openai_url),
        ("gemini_url", &config.upstreams.gemini_url),
        ("grok_url", &config.upstreams.grok_url),
        ("elevenlabs_url", &config.upstreams.elevenlabs_url),
        ("perplexity_url", &config.upstreams.perplexity_url),
    ] {
        if !base.starts_with("http://") && !base.starts_with("https://") {
            errors.push(ValidationError(format!(
                "upstreams.{name} '{base}' must be an http(s) URL"
            )));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&GatewayConfig::default()).is_ok());
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.streaming.word_delay_ms = 0;
        config.upstreams.grok_url = "ftp://wrong".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
