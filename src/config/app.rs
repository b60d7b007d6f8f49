//! Main application configuration
//!
//! This module defines the primary configuration structures for the
//! duel-finder matchmaking service, including environment variable and TOML
//! file loading and validation.

use crate::matching::{MatchingConfig, ScoringWeights};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub store: StoreSettings,
    pub matchmaking: MatchingConfig,
    pub scoring: ScoringWeights,
}

/// Service-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging and health reports
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Interface the HTTP server binds to
    pub host: String,
    /// Port the HTTP server listens on
    pub port: u16,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,
}

/// Player store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// JSON document holding the player collection
    pub players_path: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "duel-finder".to_string(),
            log_level: "info".to_string(),
            host: "0.0.0.0".to_string(),
            port: 3000,
            shutdown_timeout_seconds: 30,
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            players_path: "db/players.json".to_string(),
        }
    }
}

/// Parse an environment variable into `target` if it is set
fn override_from_env<T: FromStr>(name: &str, target: &mut T) -> Result<()> {
    if let Ok(value) = env::var(name) {
        *target = value
            .parse()
            .map_err(|_| anyhow!("Invalid {} value: {}", name, value))?;
    }
    Ok(())
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file; environment variables still win
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::from_toml(&contents)?;
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Parse configuration from TOML text, missing sections take defaults
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid TOML configuration")
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        override_from_env("SERVICE_NAME", &mut self.service.name)?;
        override_from_env("LOG_LEVEL", &mut self.service.log_level)?;
        override_from_env("HOST", &mut self.service.host)?;
        override_from_env("PORT", &mut self.service.port)?;
        override_from_env(
            "SHUTDOWN_TIMEOUT_SECONDS",
            &mut self.service.shutdown_timeout_seconds,
        )?;

        // Store settings
        override_from_env("PLAYERS_DB_PATH", &mut self.store.players_path)?;

        // Matchmaking settings
        override_from_env("MAX_MATCH_RETRY", &mut self.matchmaking.max_retries)?;
        override_from_env(
            "SKILL_DIFFERENCE_PER_RETRY",
            &mut self.matchmaking.skill_difference_per_retry,
        )?;

        // Scoring weights
        override_from_env("QUEUE_TIME_WEIGHT", &mut self.scoring.queue_time_weight)?;
        override_from_env(
            "TOTAL_SCORE_DIFFERENCE_WEIGHT",
            &mut self.scoring.total_score_difference_weight,
        )?;
        override_from_env(
            "BOTH_UNRANKED_WEIGHT",
            &mut self.scoring.both_unranked_weight,
        )?;
        override_from_env("BOTH_RANKED_WEIGHT", &mut self.scoring.both_ranked_weight)?;
        override_from_env(
            "ONLY_ONE_RANKED_WEIGHT",
            &mut self.scoring.only_one_ranked_weight,
        )?;

        Ok(())
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.service.shutdown_timeout_seconds)
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.service.host, self.service.port)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    // Validate ports
    if config.service.port == 0 {
        return Err(anyhow!("Port cannot be 0"));
    }

    // Validate timeouts
    if config.service.shutdown_timeout_seconds == 0 {
        return Err(anyhow!("Shutdown timeout must be greater than 0"));
    }

    if config.store.players_path.is_empty() {
        return Err(anyhow!("Players path cannot be empty"));
    }

    config.matchmaking.validate()?;
    config.scoring.validate()?;

    Ok(())
}
