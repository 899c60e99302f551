//! Structured logging via `tracing`.
//!
//! `RUST_LOG` wins when set; otherwise the configured level applies to
//! the gateway and tower-http request traces.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global subscriber. Call once, at startup.
pub fn init(log_level: &str) {
    let default_filter = format!("omnia_gateway={log_level},tower_http={log_level}");
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
