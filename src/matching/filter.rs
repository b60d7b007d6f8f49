//! Skill-window candidate filtering with progressive widening

use crate::error::{MatchmakingError, Result};
use crate::matching::ranking::game_ranking;
use crate::matching::selector::MatchingConfig;
use crate::types::Player;
use crate::utils::scores_within_threshold;
use tracing::debug;

/// Outcome of a successful widening search
#[derive(Debug, Clone)]
pub struct SearchWindow<'a> {
    /// 1-based attempt that produced the candidates
    pub attempt: u32,
    /// Skill threshold used on that attempt
    pub threshold: f64,
    pub candidates: Vec<&'a Player>,
}

/// Skill-difference threshold for a given attempt
pub fn skill_threshold(step: f64, attempt: u32) -> f64 {
    step * attempt as f64
}

/// Queue members whose score for `game` lies within `threshold` of `requester_score`.
/// Members with no ranking for the game are skipped.
pub fn filter_candidates<'a>(
    requester_score: f64,
    game: &str,
    queue: &'a [Player],
    threshold: f64,
) -> Vec<&'a Player> {
    queue
        .iter()
        .filter(|player| {
            game_ranking(player, game).is_some_and(|ranking| {
                scores_within_threshold(requester_score, ranking.total_score, threshold)
            })
        })
        .collect()
}

/// Widen the skill window one step per attempt until it contains somebody
pub fn widen_search<'a>(
    requester_score: f64,
    game: &str,
    queue: &'a [Player],
    config: &MatchingConfig,
) -> Result<SearchWindow<'a>> {
    for attempt in 1..=config.max_retries {
        let threshold = skill_threshold(config.skill_difference_per_retry, attempt);
        let candidates = filter_candidates(requester_score, game, queue, threshold);

        debug!(
            "Attempt {}/{} with skill threshold {}: {} candidates",
            attempt,
            config.max_retries,
            threshold,
            candidates.len()
        );

        if !candidates.is_empty() {
            return Ok(SearchWindow {
                attempt,
                threshold,
                candidates,
            });
        }
    }

    Err(MatchmakingError::NoMatchingPlayersFound.into())
}
