//! Application startup and lifecycle management.

use crate::config::GraderConfig;
use crate::handlers;
use crate::services::metrics::http_metrics_middleware;
use crate::services::providers::anthropic::{AnthropicConfig, AnthropicTextProvider};
use crate::services::providers::TextProvider;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{request_id_middleware, security_headers_middleware};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state. Everything in it is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: GraderConfig,
    pub text_provider: Arc<dyn TextProvider>,
}

/// Builds the HTTP router for the given state.
pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.upload.max_bytes;

    Router::new()
        .route("/", get(handlers::api_docs))
        .route("/api/health", get(handlers::health_check))
        .route("/api/prompt", post(handlers::prompt))
        .route("/api/prompt_initial", post(handlers::prompt_initial))
        .route("/api/prompt_redo", post(handlers::prompt_redo))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route_layer(middleware::from_fn(http_metrics_middleware))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the Anthropic provider from `config`.
    pub async fn build(config: GraderConfig) -> Result<Self, AppError> {
        let provider = AnthropicTextProvider::new(AnthropicConfig {
            api_key: config.anthropic.api_key.clone(),
            base_url: config.anthropic.base_url.clone(),
            model: config.anthropic.model.clone(),
            timeout: config.anthropic.timeout_secs.map(Duration::from_secs),
        })
        .map_err(|e| {
            tracing::error!("Failed to create Anthropic HTTP client: {}", e);
            AppError::ConfigError(anyhow::Error::new(e))
        })?;

        tracing::info!(
            model = %config.anthropic.model,
            max_tokens = config.anthropic.max_tokens,
            "Initialized Anthropic text provider"
        );

        Self::build_with_provider(config, Arc::new(provider)).await
    }

    /// Build the application around an already constructed provider.
    pub async fn build_with_provider(
        config: GraderConfig,
        text_provider: Arc<dyn TextProvider>,
    ) -> Result<Self, AppError> {
        let host: std::net::IpAddr = config.common.host.parse().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!(
                "Invalid host '{}': {}",
                config.common.host,
                e
            ))
        })?;
        let addr = SocketAddr::new(host, config.common.port);

        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        let router = build_router(AppState {
            config,
            text_provider,
        });

        tracing::info!("Grader service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router).await
    }

    /// Serve until `shutdown` resolves, letting in-flight requests finish.
    pub async fn run_with_graceful_shutdown<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}
