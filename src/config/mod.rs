//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, defaults for missing sections)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared via Arc to all handlers
//!
//! environment variables
//!     → credentials.rs (one snapshot at startup)
//!     → Credentials (Option per provider; absence surfaces as a 500
//!       ConfigurationError at request time, never a silent default.
//!       The TTS voice fallback is the one exception.)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow a zero-config start
//! - Validation separates syntactic (serde) from semantic checks
//! - Upstream base URLs live in config so tests can point them at mocks

pub mod credentials;
pub mod loader;
pub mod schema;
pub mod validation;

pub use credentials::Credentials;
pub use loader::{load_config, ConfigError};
pub use schema::GatewayConfig;
pub use schema::ListenerConfig;
pub use schema::StreamingConfig;
pub use schema::UpstreamConfig;
