//! Common types used throughout the matchmaking service

use crate::error::{MatchmakingError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique player identifier
pub type Handle = String;

/// Name of a game players are ranked in
pub type GameName = String;

/// Wire label of the unranked rank category
pub const UNRANKED: &str = "unranked";

/// Competitive rank category of a player in one game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "RankValue", into = "RankValue")]
pub enum Rank {
    /// No established competitive tier yet
    #[default]
    Unranked,
    Ranked(u32),
}

impl Rank {
    pub fn is_unranked(&self) -> bool {
        matches!(self, Rank::Unranked)
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rank::Unranked => write!(f, "{}", UNRANKED),
            Rank::Ranked(tier) => write!(f, "{}", tier),
        }
    }
}

/// Rank as stored: either the `"unranked"` label or a numeric tier
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RankValue {
    Tier(u32),
    Label(String),
}

impl TryFrom<RankValue> for Rank {
    type Error = String;

    fn try_from(value: RankValue) -> std::result::Result<Self, Self::Error> {
        match value {
            RankValue::Tier(tier) => Ok(Rank::Ranked(tier)),
            RankValue::Label(label) if label.eq_ignore_ascii_case(UNRANKED) => Ok(Rank::Unranked),
            RankValue::Label(label) => Err(format!("invalid rank: {}", label)),
        }
    }
}

impl From<Rank> for RankValue {
    fn from(rank: Rank) -> Self {
        match rank {
            Rank::Unranked => RankValue::Label(UNRANKED.to_string()),
            Rank::Ranked(tier) => RankValue::Tier(tier),
        }
    }
}

/// A player's skill record for one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRanking {
    pub game: GameName,
    #[serde(default, serialize_with = "serialize_score")]
    pub total_score: f64,
    #[serde(default)]
    pub rank: Rank,
}

/// Whole scores go back out as integers, the way they are stored
fn serialize_score<S>(score: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    if score.fract() == 0.0 && score.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*score as i64)
    } else {
        serializer.serialize_f64(*score)
    }
}

impl GameRanking {
    pub fn new(game: impl Into<GameName>, total_score: f64, rank: Rank) -> Self {
        Self {
            game: game.into(),
            total_score,
            rank,
        }
    }

    /// Beginner ranking given to a player with no record for the game
    pub fn unranked(game: impl Into<GameName>) -> Self {
        Self::new(game, 0.0, Rank::Unranked)
    }
}

/// Player record as held by the player store, keyed by `codename` on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    #[serde(rename = "codename", alias = "handle")]
    pub handle: Handle,
    #[serde(default)]
    pub rankings: Vec<GameRanking>,
    /// When the player started waiting for a match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queued_from: Option<DateTime<Utc>>,
}

impl Player {
    pub fn new(handle: impl Into<Handle>) -> Self {
        Self {
            handle: handle.into(),
            rankings: Vec::new(),
            queued_from: None,
        }
    }

    pub fn with_ranking(mut self, ranking: GameRanking) -> Self {
        self.rankings.push(ranking);
        self
    }

    pub fn queued_at(mut self, queued_from: DateTime<Utc>) -> Self {
        self.queued_from = Some(queued_from);
        self
    }
}

/// Request to find an opponent for a player in a game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRequest {
    pub player_handle: Handle,
    pub game: GameName,
}

impl MatchRequest {
    pub fn new(player_handle: impl Into<Handle>, game: impl Into<GameName>) -> Self {
        Self {
            player_handle: player_handle.into(),
            game: game.into(),
        }
    }

    /// Both fields are required, the handle is checked first
    pub fn validate(&self) -> Result<()> {
        if self.player_handle.is_empty() {
            return Err(MatchmakingError::PlayerHandleRequired.into());
        }
        if self.game.is_empty() {
            return Err(MatchmakingError::GameRequired.into());
        }
        Ok(())
    }
}

/// A candidate opponent paired with its desirability score
#[derive(Debug, Clone, Copy)]
pub struct ScoredCandidate<'a> {
    pub player: &'a Player,
    pub score: f64,
}
