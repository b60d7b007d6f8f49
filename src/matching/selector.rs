//! Opponent selection for a single match request
//!
//! This module orchestrates a match: input validation, the two store reads,
//! the requester's ranking default, queue building, the widening skill search
//! and finally best-score selection.

use crate::error::{MatchmakingError, Result};
use crate::matching::clock::TimeSource;
use crate::matching::filter::widen_search;
use crate::matching::queue::build_queue;
use crate::matching::ranking::{ensure_game_ranking, game_ranking};
use crate::matching::scorer::MatchScorer;
use crate::metrics::MetricsCollector;
use crate::store::PlayerStore;
use crate::types::{GameRanking, MatchRequest, Player, ScoredCandidate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Most widening attempts a search may be configured with
pub const MAX_RETRIES_LIMIT: u32 = 100;

/// Configuration for the skill-window search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Number of widening attempts before giving up
    pub max_retries: u32,
    /// Skill-difference threshold added on every attempt
    pub skill_difference_per_retry: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            skill_difference_per_retry: 1000.0,
        }
    }
}

impl MatchingConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.max_retries == 0 {
            return Err(MatchmakingError::ConfigurationError {
                message: "max_retries must be greater than 0".to_string(),
            }
            .into());
        }

        if self.max_retries > MAX_RETRIES_LIMIT {
            return Err(MatchmakingError::ConfigurationError {
                message: format!(
                    "max_retries must be at most {}, got {}",
                    MAX_RETRIES_LIMIT, self.max_retries
                ),
            }
            .into());
        }

        if !self.skill_difference_per_retry.is_finite() || self.skill_difference_per_retry <= 0.0
        {
            return Err(MatchmakingError::ConfigurationError {
                message: "skill_difference_per_retry must be positive".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Widest skill gap the search will ever accept
    pub fn max_skill_difference(&self) -> f64 {
        self.skill_difference_per_retry * self.max_retries as f64
    }
}

/// Finds the best waiting opponent for a player
pub struct MatchSelector {
    store: Arc<dyn PlayerStore>,
    scorer: Arc<dyn MatchScorer>,
    time_source: Arc<dyn TimeSource>,
    config: MatchingConfig,
    metrics: Option<Arc<MetricsCollector>>,
}

impl MatchSelector {
    pub fn new(
        store: Arc<dyn PlayerStore>,
        scorer: Arc<dyn MatchScorer>,
        time_source: Arc<dyn TimeSource>,
        config: MatchingConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            store,
            scorer,
            time_source,
            config,
            metrics: None,
        })
    }

    /// Record search statistics into `metrics`
    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    pub fn store(&self) -> Arc<dyn PlayerStore> {
        Arc::clone(&self.store)
    }

    /// Find an opponent for `player_handle` in `game`
    pub async fn find_match(&self, player_handle: &str, game: &str) -> Result<Player> {
        let request = MatchRequest::new(player_handle, game);
        request.validate()?;

        // The full list does not depend on the requester lookup, fetch both at once
        let (requester, all_players) = tokio::join!(
            self.store.get_by_handle(player_handle),
            self.store.get_all()
        );

        let mut requester = requester?.ok_or_else(|| MatchmakingError::PlayerNotFound {
            handle: player_handle.to_string(),
        })?;
        ensure_game_ranking(&mut requester, game);

        let all_players = all_players?.ok_or(MatchmakingError::PlayerListUnavailable)?;

        let queue = build_queue(all_players, &requester, game, self.time_source.as_ref())?;
        self.search(&requester, game, &queue).map(Player::clone)
    }

    /// Pick the best opponent for `requester` among `queue`
    pub fn search<'a>(
        &self,
        requester: &Player,
        game: &str,
        queue: &'a [Player],
    ) -> Result<&'a Player> {
        let requester_ranking = game_ranking(requester, game)
            .cloned()
            .unwrap_or_else(|| GameRanking::unranked(game));

        let window = widen_search(requester_ranking.total_score, game, queue, &self.config)?;
        if let Some(metrics) = &self.metrics {
            metrics.record_search(window.attempt, window.candidates.len());
        }

        if let [only] = window.candidates.as_slice() {
            debug!(
                "Single candidate '{}' for '{}' at threshold {}",
                only.handle, requester.handle, window.threshold
            );
            return Ok(*only);
        }

        let best = self.best_candidate(&requester_ranking, game, &window.candidates)?;

        debug!(
            "Selected '{}' for '{}' with score {:.2} out of {} candidates (attempt {})",
            best.player.handle,
            requester.handle,
            best.score,
            window.candidates.len(),
            window.attempt
        );

        Ok(best.player)
    }

    /// Highest scoring candidate; the first one encountered wins a tie
    fn best_candidate<'a>(
        &self,
        requester_ranking: &GameRanking,
        game: &str,
        candidates: &[&'a Player],
    ) -> Result<ScoredCandidate<'a>> {
        // One instant for the whole batch keeps wait times comparable
        let now = self.time_source.now();

        let mut best: Option<ScoredCandidate<'a>> = None;
        for &candidate in candidates {
            let Some(candidate_ranking) = game_ranking(candidate, game) else {
                continue;
            };

            let score = self
                .scorer
                .score(requester_ranking, candidate, candidate_ranking, now);

            match best {
                Some(current) if score <= current.score => {}
                _ => {
                    best = Some(ScoredCandidate {
                        player: candidate,
                        score,
                    })
                }
            }
        }

        best.ok_or_else(|| MatchmakingError::NoMatchingPlayersFound.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::matchmaking_error;
    use crate::matching::clock::FixedTimeSource;
    use crate::matching::scorer::{MockMatchScorer, WeightedMatchScorer};
    use crate::store::MockPlayerStore;
    use crate::types::Rank;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 0, 0).unwrap()
    }

    fn ranked(handle: &str, score: f64, rank: Rank) -> Player {
        Player::new(handle)
            .with_ranking(GameRanking::new("UT99", score, rank))
            .queued_at(now())
    }

    fn selector_with(store: Arc<MockPlayerStore>, scorer: Arc<dyn MatchScorer>) -> MatchSelector {
        MatchSelector::new(
            store,
            scorer,
            Arc::new(FixedTimeSource::at(now())),
            MatchingConfig::default(),
        )
        .unwrap()
    }

    fn selector(store: Arc<MockPlayerStore>) -> MatchSelector {
        selector_with(store, Arc::new(WeightedMatchScorer::default()))
    }

    fn expect_error(result: Result<Player>) -> MatchmakingError {
        let err = result.unwrap_err();
        matchmaking_error(&err).cloned().expect("matchmaking error")
    }

    #[test]
    fn test_config_validation() {
        assert!(MatchingConfig::default().validate().is_ok());
        assert_eq!(MatchingConfig::default().max_skill_difference(), 5000.0);

        let zero_retries = MatchingConfig {
            max_retries: 0,
            ..MatchingConfig::default()
        };
        assert!(zero_retries.validate().is_err());

        let negative_step = MatchingConfig {
            skill_difference_per_retry: -1.0,
            ..MatchingConfig::default()
        };
        assert!(negative_step.validate().is_err());
    }

    #[test]
    fn test_retry_count_is_capped() {
        let at_limit = MatchingConfig {
            max_retries: MAX_RETRIES_LIMIT,
            ..MatchingConfig::default()
        };
        assert!(at_limit.validate().is_ok());

        let runaway = MatchingConfig {
            max_retries: 4_000_000_000,
            ..MatchingConfig::default()
        };
        assert_eq!(
            matchmaking_error(&runaway.validate().unwrap_err()),
            Some(&MatchmakingError::ConfigurationError {
                message: format!(
                    "max_retries must be at most {}, got 4000000000",
                    MAX_RETRIES_LIMIT
                ),
            })
        );
    }

    #[tokio::test]
    async fn test_missing_inputs_fail_before_store_access() {
        let store = Arc::new(MockPlayerStore::new(vec![ranked("MISSE", 500.0, Rank::Unranked)]));
        let selector = selector(store.clone());

        assert_eq!(
            expect_error(selector.find_match("", "Overwatch").await),
            MatchmakingError::PlayerHandleRequired
        );
        assert_eq!(
            expect_error(selector.find_match("hankey", "").await),
            MatchmakingError::GameRequired
        );
        assert_eq!(store.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_requester() {
        let store = Arc::new(MockPlayerStore::new(vec![ranked("MISSE", 500.0, Rank::Unranked)]));
        let selector = selector(store);

        assert_eq!(
            expect_error(selector.find_match("hankey", "UT99").await),
            MatchmakingError::PlayerNotFound {
                handle: "hankey".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_unavailable_player_list() {
        let store = Arc::new(
            MockPlayerStore::new(vec![ranked("MISSE", 500.0, Rank::Unranked)])
                .with_list_unavailable(),
        );
        let selector = selector(store);

        assert_eq!(
            expect_error(selector.find_match("MISSE", "UT99").await),
            MatchmakingError::PlayerListUnavailable
        );
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let store = Arc::new(MockPlayerStore::new(Vec::new()).failing("connection reset"));
        let selector = selector(store);

        assert!(matches!(
            expect_error(selector.find_match("MISSE", "UT99").await),
            MatchmakingError::StoreError { .. }
        ));
    }

    #[tokio::test]
    async fn test_requester_without_ranking_matches_as_beginner() {
        let store = Arc::new(MockPlayerStore::new(vec![
            Player::new("MISSE"),
            ranked("Novice Bot", 410.0, Rank::Unranked),
        ]));
        let selector = selector(store);

        let opponent = selector.find_match("MISSE", "UT99").await.unwrap();
        assert_eq!(opponent.handle, "Novice Bot");
    }

    #[test]
    fn test_single_candidate_skips_scoring() {
        let mut scorer = MockMatchScorer::new();
        scorer.expect_score().times(0);

        let selector = selector_with(Arc::new(MockPlayerStore::default()), Arc::new(scorer));
        let requester = ranked("MISSE", 500.0, Rank::Unranked);
        let queue = vec![ranked("Novice Bot", 410.0, Rank::Unranked)];

        let opponent = selector.search(&requester, "UT99", &queue).unwrap();
        assert_eq!(opponent.handle, "Novice Bot");
    }

    #[test]
    fn test_scoring_uses_one_instant_per_batch() {
        let mut scorer = MockMatchScorer::new();
        scorer
            .expect_score()
            .withf(|_, _, _, at| *at == now())
            .times(3)
            .returning(|_, candidate, _, _| if candidate.handle == "b" { 10.0 } else { 1.0 });

        let selector = selector_with(Arc::new(MockPlayerStore::default()), Arc::new(scorer));
        let requester = ranked("MISSE", 500.0, Rank::Unranked);
        let queue = vec![
            ranked("a", 500.0, Rank::Unranked),
            ranked("b", 500.0, Rank::Unranked),
            ranked("c", 500.0, Rank::Unranked),
        ];

        assert_eq!(selector.search(&requester, "UT99", &queue).unwrap().handle, "b");
    }

    #[test]
    fn test_tie_keeps_first_encountered() {
        let mut scorer = MockMatchScorer::new();
        scorer.expect_score().returning(|_, _, _, _| 42.0);

        let selector = selector_with(Arc::new(MockPlayerStore::default()), Arc::new(scorer));
        let requester = ranked("MISSE", 500.0, Rank::Unranked);
        let queue = vec![
            ranked("first", 600.0, Rank::Unranked),
            ranked("second", 400.0, Rank::Unranked),
        ];

        assert_eq!(
            selector.search(&requester, "UT99", &queue).unwrap().handle,
            "first"
        );
    }

    #[test]
    fn test_prefers_smaller_skill_gap() {
        let selector = selector(Arc::new(MockPlayerStore::default()));
        let requester = ranked("MISSE", 500.0, Rank::Unranked);
        let queue = vec![
            ranked("Adept Bot", 899.0, Rank::Unranked),
            ranked("Novice Bot", 410.0, Rank::Unranked),
        ];

        assert_eq!(
            selector.search(&requester, "UT99", &queue).unwrap().handle,
            "Novice Bot"
        );
    }

    #[test]
    fn test_search_statistics_recorded() {
        let metrics = Arc::new(MetricsCollector::new().unwrap());
        let selector = selector(Arc::new(MockPlayerStore::default())).with_metrics(metrics.clone());
        let requester = ranked("MISSE", 500.0, Rank::Unranked);
        let queue = vec![
            ranked("a", 2100.0, Rank::Unranked),
            ranked("b", 2400.0, Rank::Unranked),
        ];

        selector.search(&requester, "UT99", &queue).unwrap();

        assert_eq!(metrics.matching().search_attempts.get_sample_sum(), 2.0);
        assert_eq!(metrics.matching().candidates_considered.get_sample_sum(), 2.0);
    }

    #[test]
    fn test_prefers_long_wait() {
        let selector = selector(Arc::new(MockPlayerStore::default()));
        let requester = ranked("MISSE", 500.0, Rank::Unranked);
        let queue = vec![
            ranked("Novice Bot", 410.0, Rank::Unranked),
            ranked("Adept Bot", 899.0, Rank::Unranked).queued_at(now() - Duration::hours(10)),
        ];

        assert_eq!(
            selector.search(&requester, "UT99", &queue).unwrap().handle,
            "Adept Bot"
        );
    }
}
