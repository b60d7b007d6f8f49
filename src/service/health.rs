//! Health checks and monitoring
//!
//! This module provides health check functionality for the duel-finder
//! matchmaking service.

use crate::service::app::AppState;
use serde::{Deserialize, Serialize};
use tracing::error;

/// Health check status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    /// Gauge value exported to Prometheus
    pub fn as_gauge(&self) -> u8 {
        match self {
            HealthStatus::Healthy => 2,
            HealthStatus::Degraded => 1,
            HealthStatus::Unhealthy => 0,
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "healthy"),
            HealthStatus::Degraded => write!(f, "degraded"),
            HealthStatus::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    /// Overall service status
    pub status: HealthStatus,
    /// Service name
    pub service: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub uptime_seconds: u64,
    /// Detailed component checks
    pub checks: Vec<ComponentCheck>,
}

/// Individual component health check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentCheck {
    /// Component name
    pub name: String,
    /// Component status
    pub status: HealthStatus,
    /// Optional detail message
    pub message: Option<String>,
    /// Check duration in milliseconds
    pub duration_ms: u64,
}

impl HealthCheck {
    /// Check every component and fold the results into one status
    pub async fn check(app_state: &AppState) -> Self {
        let store_check = Self::check_player_store(app_state).await;
        let status = store_check.status;

        let metrics = app_state.metrics();
        metrics.update_component_health(&store_check.name, status == HealthStatus::Healthy);
        metrics.update_health_status(status.as_gauge());
        metrics.update_uptime(app_state.uptime());

        HealthCheck {
            status,
            service: app_state.config().service.name.clone(),
            version: crate::VERSION.to_string(),
            timestamp: chrono::Utc::now(),
            uptime_seconds: app_state.uptime().as_secs(),
            checks: vec![store_check],
        }
    }

    /// The store must be able to supply the player collection
    async fn check_player_store(app_state: &AppState) -> ComponentCheck {
        let start = std::time::Instant::now();

        let (status, message) = match app_state.store().get_all().await {
            Ok(Some(players)) => (
                HealthStatus::Healthy,
                Some(format!("{} players available", players.len())),
            ),
            Ok(None) => (
                HealthStatus::Degraded,
                Some("Player collection unavailable".to_string()),
            ),
            Err(e) => {
                error!("Player store health check failed: {}", e);
                (HealthStatus::Unhealthy, Some(e.to_string()))
            }
        };

        ComponentCheck {
            name: "player_store".to_string(),
            status,
            message,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Convert health check to JSON string
    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| anyhow::anyhow!("Failed to serialize health check: {}", e))
    }
}
