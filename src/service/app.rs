//! Main application state and service wiring
//!
//! This module contains the production AppState that ties the configuration,
//! the player store, the match selector and metrics together.

use crate::config::AppConfig;
use crate::matching::{MatchSelector, SystemTimeSource, TimeSource, WeightedMatchScorer};
use crate::metrics::MetricsCollector;
use crate::store::{JsonFilePlayerStore, PlayerStore};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::info;

/// Service-level errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Service initialization error: {message}")]
    Initialization { message: String },

    #[error("HTTP server error: {message}")]
    Server { message: String },
}

/// Main application state containing all service components
pub struct AppState {
    /// Application configuration
    config: AppConfig,

    /// Player store the selector reads from
    store: Arc<dyn PlayerStore>,

    /// Core matchmaking component
    selector: Arc<MatchSelector>,

    /// Metrics collector for monitoring and health checks
    metrics: Arc<MetricsCollector>,

    started_at: Instant,
}

impl AppState {
    /// Initialize the application with production dependencies
    pub fn new(config: AppConfig) -> Result<Self, ServiceError> {
        info!(
            "Initializing {} with player collection {}",
            config.service.name, config.store.players_path
        );

        let store = Arc::new(JsonFilePlayerStore::new(&config.store.players_path));
        Self::with_components(config, store, Arc::new(SystemTimeSource::new()))
    }

    /// Initialize the application around a given store and time source
    pub fn with_components(
        config: AppConfig,
        store: Arc<dyn PlayerStore>,
        time_source: Arc<dyn TimeSource>,
    ) -> Result<Self, ServiceError> {
        crate::config::validate_config(&config).map_err(|e| ServiceError::Configuration {
            message: e.to_string(),
        })?;

        let metrics = Arc::new(
            MetricsCollector::new().map_err(|e| ServiceError::Initialization {
                message: format!("Failed to create metrics collector: {}", e),
            })?,
        );

        let scorer = Arc::new(WeightedMatchScorer::new(config.scoring.clone()));
        let selector = MatchSelector::new(
            store.clone(),
            scorer,
            time_source,
            config.matchmaking.clone(),
        )
        .map_err(|e| ServiceError::Initialization {
            message: format!("Failed to create match selector: {}", e),
        })?
        .with_metrics(metrics.clone());

        Ok(Self {
            config,
            store,
            selector: Arc::new(selector),
            metrics,
            started_at: Instant::now(),
        })
    }

    /// Get service configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get the player store
    pub fn store(&self) -> Arc<dyn PlayerStore> {
        self.store.clone()
    }

    /// Get the match selector
    pub fn selector(&self) -> Arc<MatchSelector> {
        self.selector.clone()
    }

    /// Get the metrics collector
    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.metrics.clone()
    }

    /// Time since the state was created
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
