//! Test fixtures and helper implementations for integration testing

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use duel_finder::config::AppConfig;
use duel_finder::matching::{
    FixedTimeSource, MatchScorer, MatchSelector, MatchingConfig, ScoringWeights,
    WeightedMatchScorer,
};
use duel_finder::service::{router, AppState};
use duel_finder::store::{InMemoryPlayerStore, PlayerStore};
use duel_finder::types::{GameRanking, Player, Rank};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Fixed "now" shared by the scenarios
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 18, 0, 0).unwrap()
}

/// Path of a file under `tests/fixtures`
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Ranked player waiting since `waited` before [`test_now`]
pub fn ranked_player(handle: &str, game: &str, score: f64, tier: u32, waited: Duration) -> Player {
    Player::new(handle)
        .with_ranking(GameRanking::new(game, score, Rank::Ranked(tier)))
        .queued_at(test_now() - waited)
}

/// Unranked player waiting since `waited` before [`test_now`]
pub fn unranked_player(handle: &str, game: &str, score: f64, waited: Duration) -> Player {
    Player::new(handle)
        .with_ranking(GameRanking::new(game, score, Rank::Unranked))
        .queued_at(test_now() - waited)
}

/// Scorer that counts its invocations and delegates to the weighted scorer
pub struct CountingScorer {
    inner: WeightedMatchScorer,
    calls: AtomicUsize,
}

impl CountingScorer {
    pub fn new() -> Self {
        Self {
            inner: WeightedMatchScorer::new(ScoringWeights::default()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MatchScorer for CountingScorer {
    fn score(
        &self,
        requester_ranking: &GameRanking,
        candidate: &Player,
        candidate_ranking: &GameRanking,
        now: DateTime<Utc>,
    ) -> f64 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner
            .score(requester_ranking, candidate, candidate_ranking, now)
    }
}

/// Selector over an in-memory store, a fixed clock and a counting scorer
pub struct TestSystem {
    pub store: Arc<InMemoryPlayerStore>,
    pub scorer: Arc<CountingScorer>,
    pub time_source: Arc<FixedTimeSource>,
    pub selector: MatchSelector,
}

impl TestSystem {
    pub fn new(players: Vec<Player>) -> Self {
        Self::with_config(players, MatchingConfig::default())
    }

    pub fn with_config(players: Vec<Player>, config: MatchingConfig) -> Self {
        let store = Arc::new(InMemoryPlayerStore::with_players(players));
        let scorer = Arc::new(CountingScorer::new());
        let time_source = Arc::new(FixedTimeSource::new(test_now(), Duration::minutes(5)));

        let selector = MatchSelector::new(
            store.clone() as Arc<dyn PlayerStore>,
            scorer.clone(),
            time_source.clone(),
            config,
        )
        .expect("valid matching config");

        Self {
            store,
            scorer,
            time_source,
            selector,
        }
    }
}

/// Full HTTP application over the given players
pub fn test_app(players: Vec<Player>) -> (Arc<AppState>, axum::Router) {
    let state = Arc::new(
        AppState::with_components(
            AppConfig::default(),
            Arc::new(InMemoryPlayerStore::with_players(players)),
            Arc::new(FixedTimeSource::new(test_now(), Duration::minutes(5))),
        )
        .expect("valid default config"),
    );
    let app = router(state.clone());
    (state, app)
}
