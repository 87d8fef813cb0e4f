//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the report handlers
//! - Wire up middleware (tracing, body limit, timeout)
//! - Bind the server to a listener with peer-address propagation
//! - Shut down gracefully on Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::CollectorConfig;
use crate::context::ContextBuilder;
use crate::http::handlers::{handle_csp, handle_error, AppState};
use crate::observability::ReportSink;

/// HTTP server for the report collector.
pub struct CollectorServer {
    router: Router,
    config: CollectorConfig,
}

impl CollectorServer {
    /// Create a new server with the given configuration and injected sink.
    pub fn new(config: CollectorConfig, sink: Arc<dyn ReportSink>) -> Self {
        let state = AppState {
            sink,
            builder: ContextBuilder::new(config.identity.cookie()),
            mode: config.report_mode,
            max_body_bytes: config.limits.max_body_bytes,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &CollectorConfig, state: AppState) -> Router {
        Router::new()
            .route("/error", post(handle_error))
            .route("/csp", post(handle_csp))
            .with_state(state)
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(config.limits.request_timeout_secs),
            ))
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mode = ?self.config.report_mode,
            identity = self.config.identity.enabled,
            "HTTP server starting"
        );

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
