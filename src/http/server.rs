//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with every `/api/*` handler
//! - Wire up middleware (CORS, tracing, limits, request ID, metrics)
//! - Share the provider clients and credential snapshot via `AppState`
//! - Serve with graceful shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::handler::Handler;
use axum::routing::{get, post, MethodRouter};
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::{Credentials, GatewayConfig};
use crate::error::GatewayError;
use crate::handlers;
use crate::http::middleware;
use crate::providers::claude::ClaudeClient;
use crate::providers::document_ai::DocumentAiClient;
use crate::providers::elevenlabs::ElevenLabsClient;
use crate::providers::gemini::GeminiClient;
use crate::providers::google_auth::{ServiceAccountKey, TokenProvider};
use crate::providers::google_search::GoogleSearchClient;
use crate::providers::google_tts::GoogleTtsClient;
use crate::providers::grok::GrokClient;
use crate::providers::openai::OpenAiClient;
use crate::providers::perplexity::PerplexityClient;
use crate::providers::serpapi::SerpApiClient;
use crate::providers::storage::StorageClient;

/// Shared state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    config: GatewayConfig,
    credentials: Credentials,
    http: reqwest::Client,
    google_token: TokenProvider,
}

impl AppState {
    pub fn new(config: GatewayConfig, credentials: Credentials) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.upstream_secs))
            .build()
            .unwrap_or_default();

        Self {
            inner: Arc::new(InnerState {
                config,
                credentials,
                http,
                google_token: TokenProvider::new(),
            }),
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.inner.config
    }

    pub fn credentials(&self) -> &Credentials {
        &self.inner.credentials
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }

    // ── Provider client factories ───────────────────────────────────────
    //
    // Each factory fails with a ConfigurationError when its credential
    // is absent; the upstream is never called in that case.

    pub fn claude(&self) -> Result<ClaudeClient<'_>, GatewayError> {
        Ok(ClaudeClient {
            http: self.http(),
            base_url: &self.inner.config.upstreams.anthropic_url,
            api_key: Credentials::require(
                &self.inner.credentials.claude_api_key,
                "CLAUDE_API_KEY",
            )?,
        })
    }

    pub fn openai(&self) -> Result<OpenAiClient<'_>, GatewayError> {
        Ok(OpenAiClient {
            http: self.http(),
            base_url: &self.inner.config.upstreams.openai_url,
            api_key: Credentials::require(
                &self.inner.credentials.openai_api_key,
                "OPENAI_API_KEY",
            )?,
        })
    }

    pub fn grok(&self) -> Result<GrokClient<'_>, GatewayError> {
        Ok(GrokClient {
            http: self.http(),
            base_url: &self.inner.config.upstreams.grok_url,
            api_key: Credentials::require(&self.inner.credentials.grok_api_key, "GROK_API_KEY")?,
        })
    }

    pub fn gemini(&self) -> GeminiClient<'_> {
        GeminiClient {
            http: self.http(),
            base_url: &self.inner.config.upstreams.gemini_url,
        }
    }

    pub fn elevenlabs(&self) -> Result<ElevenLabsClient<'_>, GatewayError> {
        Ok(ElevenLabsClient {
            http: self.http(),
            base_url: &self.inner.config.upstreams.elevenlabs_url,
            api_key: Credentials::require(
                &self.inner.credentials.elevenlabs_api_key,
                "ELEVENLABS_API_KEY",
            )?,
        })
    }

    pub fn perplexity(&self) -> Result<PerplexityClient<'_>, GatewayError> {
        Ok(PerplexityClient {
            http: self.http(),
            base_url: &self.inner.config.upstreams.perplexity_url,
            api_key: Credentials::require(
                &self.inner.credentials.perplexity_api_key,
                "PERPLEXITY_API_KEY",
            )?,
        })
    }

    pub fn google_search(&self) -> Result<GoogleSearchClient<'_>, GatewayError> {
        Ok(GoogleSearchClient {
            http: self.http(),
            base_url: &self.inner.config.upstreams.customsearch_url,
            api_key: Credentials::require(
                &self.inner.credentials.google_api_key,
                "GOOGLE_API_KEY",
            )?,
            cse_id: Credentials::require(&self.inner.credentials.google_cse_id, "GOOGLE_CSE_ID")?,
        })
    }

    pub fn serpapi(&self) -> Result<SerpApiClient<'_>, GatewayError> {
        Ok(SerpApiClient {
            http: self.http(),
            base_url: &self.inner.config.upstreams.serpapi_url,
            api_key: Credentials::require(
                &self.inner.credentials.serpapi_api_key,
                "SERPAPI_API_KEY",
            )?,
        })
    }

    pub fn google_tts(&self) -> Result<GoogleTtsClient<'_>, GatewayError> {
        Ok(GoogleTtsClient {
            http: self.http(),
            base_url: &self.inner.config.upstreams.google_tts_url,
            api_key: Credentials::require(
                &self.inner.credentials.google_api_key,
                "GOOGLE_API_KEY",
            )?,
        })
    }

    pub fn document_ai(&self) -> Result<DocumentAiClient<'_>, GatewayError> {
        let creds = &self.inner.credentials;
        Ok(DocumentAiClient {
            http: self.http(),
            base_url_template: &self.inner.config.upstreams.documentai_url,
            project_id: Credentials::require(&creds.google_project_id, "GOOGLE_CLOUD_PROJECT_ID")?,
            location: Credentials::require(&creds.document_ai_location, "DOCUMENT_AI_LOCATION")?,
            processor_id: Credentials::require(
                &creds.document_ai_processor_id,
                "DOCUMENT_AI_PROCESSOR_ID",
            )?,
        })
    }

    /// Decode the service-account key from the environment snapshot.
    pub fn google_service_account(&self) -> Result<ServiceAccountKey, GatewayError> {
        let encoded = Credentials::require(
            &self.inner.credentials.google_credentials_base64,
            "GOOGLE_CREDENTIALS_BASE64",
        )?;
        ServiceAccountKey::from_base64(encoded)
    }

    /// A valid OAuth access token for Google APIs (cached).
    pub async fn google_access_token(&self) -> Result<String, GatewayError> {
        let key = self.google_service_account()?;
        self.inner
            .google_token
            .access_token(
                self.http(),
                &self.inner.config.upstreams.oauth_token_url,
                &key,
            )
            .await
    }

    pub fn storage(&self, key: &ServiceAccountKey) -> Result<StorageClient<'_>, GatewayError> {
        Ok(StorageClient {
            http: self.http(),
            storage_url: &self.inner.config.upstreams.storage_url,
            iam_url: &self.inner.config.upstreams.iam_url,
            bucket: Credentials::require(
                &self.inner.credentials.google_storage_bucket,
                "GOOGLE_STORAGE_BUCKET",
            )?,
            client_email: key.client_email.clone(),
        })
    }
}

/// HTTP server for the gateway.
pub struct Gateway {
    router: Router,
    config: GatewayConfig,
}

impl Gateway {
    /// Create a new server with the given configuration and credential
    /// snapshot.
    pub fn new(config: GatewayConfig, credentials: Credentials) -> Self {
        let state = AppState::new(config.clone(), credentials);
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/health", get(handlers::health::health))
            .route("/api/claude", api(handlers::chat::claude))
            .route("/api/claude2", api(handlers::chat::claude2))
            .route(
                "/api/claude-web-search",
                api(handlers::search::claude_web_search),
            )
            .route("/api/openai", api(handlers::chat::openai))
            .route("/api/gemini", api(handlers::chat::gemini))
            .route("/api/grok", api(handlers::chat::grok))
            .route("/api/imagen", api(handlers::images::imagen))
            .route("/api/elevenlabs-tts", api(handlers::audio::elevenlabs_tts))
            .route("/api/google-tts", api(handlers::audio::google_tts))
            .route("/api/voice", api(handlers::audio::voice))
            .route(
                "/api/voice-to-voice",
                raw(
                    handlers::audio::voice_to_voice,
                    config.limits.max_audio_bytes,
                ),
            )
            .route(
                "/api/whisper",
                raw(handlers::audio::whisper, config.limits.max_audio_bytes),
            )
            .route("/api/sonar-search", api(handlers::search::sonar_search))
            .route(
                "/api/perplexity-search",
                api(handlers::search::perplexity_search),
            )
            .route("/api/google-search", api(handlers::search::google_search))
            .route("/api/news", api(handlers::search::news))
            .route(
                "/api/get-upload-url",
                api(handlers::documents::get_upload_url),
            )
            .route(
                "/api/process-document",
                raw(
                    handlers::documents::process_document,
                    config.limits.max_document_bytes,
                ),
            )
            .route(
                "/api/process-document-gcs",
                api(handlers::documents::process_document_gcs),
            )
            .route(
                "/api/upload-to-gemini",
                api(handlers::documents::upload_to_gemini),
            )
            .fallback(middleware::not_found)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    )))
                    .layer(DefaultBodyLimit::max(config.limits.max_json_bytes))
                    .layer(middleware::cors_layer())
                    .layer(axum::middleware::from_fn(middleware::track_metrics)),
            )
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: tokio::sync::broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "gateway listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("gateway stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// POST route with the shared OPTIONS/405 fallback. Bodies are capped
/// at the configured JSON limit by the router-level layer.
fn api<H, T>(handler: H) -> MethodRouter<AppState>
where
    H: Handler<T, AppState>,
    T: 'static,
{
    post(handler).fallback(middleware::method_fallback)
}

/// Headroom between the extractor cap and the handler's own size check,
/// so oversized uploads still get the JSON error envelope instead of a
/// bare 413 from the extractor.
const RAW_BODY_HEADROOM: usize = 64 * 1024;

/// POST route that consumes the request body directly (audio and
/// document uploads), with a per-route body cap above `limit`.
fn raw<H, T>(handler: H, limit: usize) -> MethodRouter<AppState>
where
    H: Handler<T, AppState>,
    T: 'static,
{
    api(handler).layer(DefaultBodyLimit::max(limit.saturating_add(RAW_BODY_HEADROOM)))
}
