//! Omnia gateway: the HTTP backend of a multilingual voice assistant.
//!
//! Every `/api/*` handler proxies exactly one upstream provider
//! (Anthropic, OpenAI, Google, xAI, ElevenLabs, Perplexity, SerpAPI)
//! and normalizes the answers onto one outward contract: JSON envelopes
//! with explicit UTF-8 charset, binary audio relays, and a uniform
//! streaming frame protocol regardless of whether the upstream streams.

pub mod chat;
pub mod config;
pub mod error;
pub mod handlers;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod providers;
pub mod sources;
pub mod stream;
pub mod text;

pub use config::{load_config, Credentials, GatewayConfig};
pub use error::GatewayError;
pub use http::{AppState, Gateway};
