//! Duel Finder - Matchmaking microservice for one-on-one games
//!
//! This crate pairs a requesting player with the most suitable waiting
//! opponent for a game, widening the skill window step by step and ranking
//! the candidates with a weighted desirability score.

pub mod config;
pub mod error;
pub mod matching;
pub mod metrics;
pub mod service;
pub mod store;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{ErrorClass, MatchmakingError, Result};
pub use types::*;

// Re-export key components
pub use matching::{MatchScorer, MatchSelector, MatchingConfig, ScoringWeights, TimeSource};
pub use store::{InMemoryPlayerStore, JsonFilePlayerStore, PlayerStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
