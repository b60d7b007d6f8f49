//! Utility functions for the matchmaking service

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a new unique request ID
pub fn generate_request_id() -> Uuid {
    Uuid::new_v4()
}

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Calculate the absolute difference between two skill scores
pub fn score_difference(score1: f64, score2: f64) -> f64 {
    (score1 - score2).abs()
}

/// Check if two skill scores are within the given threshold
pub fn scores_within_threshold(score1: f64, score2: f64, threshold: f64) -> bool {
    score_difference(score1, score2) <= threshold
}

/// Seconds elapsed between two instants, negative if `to` is before `from`
pub fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 1000.0
}
