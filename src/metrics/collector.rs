//! Metrics collection using Prometheus
//!
//! This module provides metrics collection for the duel-finder matchmaking
//! service using Prometheus metrics.

use anyhow::Result;
use prometheus::{Histogram, HistogramOpts, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main metrics collector for the matchmaking service
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Service-level metrics
    service_metrics: ServiceMetrics,

    /// Match request metrics
    match_metrics: MatchMetrics,
}

/// Service-level metrics
#[derive(Clone)]
pub struct ServiceMetrics {
    /// Service uptime in seconds
    pub uptime_seconds: IntGauge,

    /// Health check status (0=unhealthy, 1=degraded, 2=healthy)
    pub health_status: IntGauge,

    /// Component health status
    pub component_health: IntGaugeVec,
}

/// Match request metrics
#[derive(Clone)]
pub struct MatchMetrics {
    /// Match requests by outcome
    pub requests_total: IntCounterVec,

    /// Match request processing time
    pub request_duration: Histogram,

    /// Widening attempt that produced candidates
    pub search_attempts: Histogram,

    /// Candidates inside the final skill window
    pub candidates_considered: Histogram,
}

impl MetricsCollector {
    /// Create a new metrics collector with default registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let service_metrics = ServiceMetrics::new(&registry)?;
        let match_metrics = MatchMetrics::new(&registry)?;

        Ok(Self {
            registry,
            service_metrics,
            match_metrics,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Get service metrics
    pub fn service(&self) -> &ServiceMetrics {
        &self.service_metrics
    }

    /// Get match metrics
    pub fn matching(&self) -> &MatchMetrics {
        &self.match_metrics
    }

    /// Record a finished match request
    pub fn record_match_request(&self, outcome: &str, duration: Duration) {
        self.match_metrics
            .requests_total
            .with_label_values(&[outcome])
            .inc();

        self.match_metrics
            .request_duration
            .observe(duration.as_secs_f64());
    }

    /// Record the skill window a search settled on
    pub fn record_search(&self, attempt: u32, candidates: usize) {
        self.match_metrics.search_attempts.observe(attempt as f64);
        self.match_metrics
            .candidates_considered
            .observe(candidates as f64);
    }

    /// Update uptime
    pub fn update_uptime(&self, uptime: Duration) {
        self.service_metrics
            .uptime_seconds
            .set(uptime.as_secs() as i64);
    }

    /// Update health status
    pub fn update_health_status(&self, status: u8) {
        self.service_metrics.health_status.set(status as i64);
    }

    /// Update component health
    pub fn update_component_health(&self, component: &str, healthy: bool) {
        let status = if healthy { 1 } else { 0 };
        self.service_metrics
            .component_health
            .with_label_values(&[component])
            .set(status);
    }

    /// Create a timer for measuring operation duration
    pub fn start_timer(&self) -> MetricsTimer {
        MetricsTimer::new()
    }
}

/// Timer for measuring operation durations
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get the elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and return the duration
    pub fn stop(self) -> Duration {
        self.elapsed()
    }
}

impl ServiceMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let uptime_seconds =
            IntGauge::new("duel_finder_uptime_seconds", "Service uptime in seconds")?;
        registry.register(Box::new(uptime_seconds.clone()))?;

        let health_status = IntGauge::new(
            "duel_finder_health_status",
            "Health status (0=unhealthy, 1=degraded, 2=healthy)",
        )?;
        registry.register(Box::new(health_status.clone()))?;

        let component_health = IntGaugeVec::new(
            Opts::new("duel_finder_component_health", "Component health status"),
            &["component"],
        )?;
        registry.register(Box::new(component_health.clone()))?;

        Ok(Self {
            uptime_seconds,
            health_status,
            component_health,
        })
    }
}

impl MatchMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let requests_total = IntCounterVec::new(
            Opts::new(
                "duel_finder_match_requests_total",
                "Total match requests by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        let request_duration = Histogram::with_opts(
            HistogramOpts::new(
                "duel_finder_match_request_duration_seconds",
                "Time taken to answer a match request",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),
        )?;
        registry.register(Box::new(request_duration.clone()))?;

        let search_attempts = Histogram::with_opts(
            HistogramOpts::new(
                "duel_finder_match_search_attempts",
                "Widening attempt that produced candidates",
            )
            .buckets(vec![1.0, 2.0, 3.0, 4.0, 5.0, 7.0, 10.0]),
        )?;
        registry.register(Box::new(search_attempts.clone()))?;

        let candidates_considered = Histogram::with_opts(
            HistogramOpts::new(
                "duel_finder_match_candidates_considered",
                "Candidates inside the final skill window",
            )
            .buckets(vec![1.0, 2.0, 5.0, 10.0, 25.0, 50.0, 100.0, 500.0]),
        )?;
        registry.register(Box::new(candidates_considered.clone()))?;

        Ok(Self {
            requests_total,
            request_duration,
            search_attempts,
            candidates_considered,
        })
    }
}
