//! Opponent matching for the matchmaking service
//!
//! This module finds the best waiting opponent for a player: the queue of
//! eligible players is built, narrowed by a widening skill window and the
//! survivors are scored on wait time, skill gap and rank parity.

pub mod clock;
pub mod filter;
pub mod queue;
pub mod ranking;
pub mod scorer;
pub mod selector;

// Re-export commonly used types
pub use clock::{FixedTimeSource, SystemTimeSource, TimeSource};
pub use filter::{filter_candidates, skill_threshold, widen_search, SearchWindow};
pub use queue::build_queue;
pub use ranking::{ensure_game_ranking, game_ranking};
pub use scorer::{MatchScorer, ScoringWeights, WeightedMatchScorer};
pub use selector::{MatchSelector, MatchingConfig, MAX_RETRIES_LIMIT};
