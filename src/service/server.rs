//! HTTP server for the matchmaking, health and metrics endpoints
//!
//! Routes are served with Axum. Shutdown is driven by a broadcast channel so
//! the process can stop the server from a signal handler.

use crate::service::app::{AppState, ServiceError};
use crate::service::handlers::{find_match_handler, missing_handle_handler};
use crate::service::health::{HealthCheck, HealthStatus};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{debug, error, info};

/// Build the router with every endpoint of the service
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/alive", get(alive_handler))
        .route("/metrics", get(metrics_handler))
        .route("/matchmaker", get(missing_handle_handler))
        .route("/matchmaker/", get(missing_handle_handler))
        .route("/matchmaker/{player_handle}", get(find_match_handler))
        .with_state(state)
}

/// HTTP server bound to the configured host and port
pub struct HttpServer {
    state: Arc<AppState>,
    shutdown_tx: broadcast::Sender<()>,
}

impl HttpServer {
    pub fn new(state: Arc<AppState>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self { state, shutdown_tx }
    }

    /// Sender that stops the server once a value is sent
    pub fn shutdown_handle(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Bind and serve until a shutdown signal arrives
    pub async fn start(self) -> Result<(), ServiceError> {
        let address = self.state.config().bind_address();
        let addr: SocketAddr = address.parse().map_err(|e| ServiceError::Server {
            message: format!("Invalid bind address {}: {}", address, e),
        })?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServiceError::Server {
                message: format!("Failed to bind {}: {}", addr, e),
            })?;

        info!("Matchmaker listening on http://{}", addr);

        let mut shutdown_rx = self.shutdown_tx.subscribe();
        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("HTTP server shutdown signal received");
            })
            .await
            .map_err(|e| ServiceError::Server {
                message: e.to_string(),
            })?;

        info!("HTTP server stopped");
        Ok(())
    }
}

/// Root endpoint handler - shows service information
async fn root_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "service": state.config().service.name,
        "version": crate::VERSION,
        "endpoints": [
            "/matchmaker/{player_handle}?game={game}",
            "/health",
            "/alive",
            "/metrics"
        ]
    }))
}

async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    debug!("Health check requested");

    let health = HealthCheck::check(&state).await;
    let status = match health.status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status, Json(health))
}

/// Liveness only says the process answers requests
async fn alive_handler() -> impl IntoResponse {
    (StatusCode::OK, "Alive")
}

/// Prometheus metrics endpoint handler
async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    let metrics = state.metrics();
    metrics.update_uptime(state.uptime());

    let metric_families = metrics.registry().gather();
    let encoder = TextEncoder::new();

    match encoder.encode_to_string(&metric_families) {
        Ok(output) => {
            debug!("Serving {} metric families", metric_families.len());
            (
                [(header::CONTENT_TYPE, encoder.format_type().to_string())],
                output,
            )
                .into_response()
        }
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to encode metrics",
            )
                .into_response()
        }
    }
}
