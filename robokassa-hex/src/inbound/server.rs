//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use robokassa_types::RequestMethod;

use super::handlers::{self, AppState, PAYMENT_URL_PATH, RESULT_URL_PATH};
use crate::{GatewayService, ResultRequestOptions};

/// HTTP Server for the gateway integration.
pub struct HttpServer {
    state: Arc<AppState>,
}

impl HttpServer {
    /// Creates a new HTTP server with the given service.
    pub fn new(service: GatewayService) -> Self {
        Self::with_result_options(service, ResultRequestOptions::default())
    }

    /// Creates a new HTTP server with ResultURL overrides.
    pub fn with_result_options(service: GatewayService, options: ResultRequestOptions) -> Self {
        Self {
            state: Arc::new(AppState { service, options }),
        }
    }

    /// Builds the Axum router with all routes.
    ///
    /// The ResultURL route only answers the configured request method.
    pub fn router(&self) -> Router {
        // Build HTTP metrics layer (uses globally set MeterProvider)
        let metrics = axum_otel_metrics::HttpMetricsLayerBuilder::new().build();

        let result_route = match self.state.service.result_method(&self.state.options) {
            RequestMethod::Get => get(handlers::result_url_query),
            RequestMethod::Post => post(handlers::result_url_form),
        };

        Router::new()
            .route("/health", get(handlers::health))
            .route(PAYMENT_URL_PATH, post(handlers::create_payment_url))
            .route(RESULT_URL_PATH, result_route)
            .layer(metrics)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);
        tracing::info!(
            "ResultURL endpoint: {} {}",
            self.state.service.result_method(&self.state.options),
            RESULT_URL_PATH
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
