//! Opponent desirability scoring
//!
//! Score of a candidate opponent, higher is better:
//!
//! ```text
//! score = seconds waited × queue_time_weight
//!       + |requester score − candidate score| × total_score_difference_weight
//!       + rank term
//! ```
//!
//! The rank term is `both_unranked_weight` when neither player is ranked,
//! `|rank difference| × both_ranked_weight` when both are, and
//! `only_one_ranked_weight` otherwise. Penalties are expressed as negative
//! weights and added like any other term.

use crate::types::{GameRanking, Player, Rank};
use crate::utils::{score_difference, seconds_between};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Weights applied to each scoring criterion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Per second spent in the queue
    pub queue_time_weight: f64,
    /// Per point of total score difference
    pub total_score_difference_weight: f64,
    /// Flat term when both players are unranked
    pub both_unranked_weight: f64,
    /// Per tier of rank difference when both players are ranked
    pub both_ranked_weight: f64,
    /// Flat term when exactly one player is ranked
    pub only_one_ranked_weight: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            queue_time_weight: 2.0,
            total_score_difference_weight: -1.0,
            both_unranked_weight: 100.0,
            both_ranked_weight: -1.0,
            only_one_ranked_weight: -100.0,
        }
    }
}

impl ScoringWeights {
    /// All weights must be finite numbers
    pub fn validate(&self) -> crate::error::Result<()> {
        let weights = [
            ("queue_time_weight", self.queue_time_weight),
            (
                "total_score_difference_weight",
                self.total_score_difference_weight,
            ),
            ("both_unranked_weight", self.both_unranked_weight),
            ("both_ranked_weight", self.both_ranked_weight),
            ("only_one_ranked_weight", self.only_one_ranked_weight),
        ];

        for (name, value) in weights {
            if !value.is_finite() {
                return Err(crate::error::MatchmakingError::ConfigurationError {
                    message: format!("{} must be a finite number", name),
                }
                .into());
            }
        }

        Ok(())
    }
}

/// Trait for scoring candidate opponents
#[cfg_attr(test, mockall::automock)]
pub trait MatchScorer: Send + Sync {
    /// Desirability of `candidate` as an opponent, evaluated at `now`
    fn score(
        &self,
        requester_ranking: &GameRanking,
        candidate: &Player,
        candidate_ranking: &GameRanking,
        now: DateTime<Utc>,
    ) -> f64;
}

/// Linear scorer over wait time, skill gap and rank parity
#[derive(Debug, Clone, Default)]
pub struct WeightedMatchScorer {
    weights: ScoringWeights,
}

impl WeightedMatchScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    fn queue_time_term(&self, candidate: &Player, now: DateTime<Utc>) -> f64 {
        let waited = candidate
            .queued_from
            .map(|queued_from| seconds_between(queued_from, now))
            .unwrap_or(0.0);
        waited * self.weights.queue_time_weight
    }

    fn total_score_term(&self, requester: &GameRanking, candidate: &GameRanking) -> f64 {
        score_difference(requester.total_score, candidate.total_score)
            * self.weights.total_score_difference_weight
    }

    fn rank_term(&self, requester: Rank, candidate: Rank) -> f64 {
        match (requester, candidate) {
            (Rank::Unranked, Rank::Unranked) => self.weights.both_unranked_weight,
            (Rank::Ranked(a), Rank::Ranked(b)) => {
                a.abs_diff(b) as f64 * self.weights.both_ranked_weight
            }
            _ => self.weights.only_one_ranked_weight,
        }
    }
}

impl MatchScorer for WeightedMatchScorer {
    fn score(
        &self,
        requester_ranking: &GameRanking,
        candidate: &Player,
        candidate_ranking: &GameRanking,
        now: DateTime<Utc>,
    ) -> f64 {
        self.queue_time_term(candidate, now)
            + self.total_score_term(requester_ranking, candidate_ranking)
            + self.rank_term(requester_ranking.rank, candidate_ranking.rank)
    }
}
