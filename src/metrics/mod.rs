//! Metrics and monitoring for the duel-finder matchmaking service
//!
//! This module provides Prometheus metrics for match requests and service
//! health.

pub mod collector;

pub use collector::{MatchMetrics, MetricsCollector, MetricsTimer, ServiceMetrics};
