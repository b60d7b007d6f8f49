//! Error types for the matchmaking service
//!
//! Failures are raised as [`MatchmakingError`] values wrapped in `anyhow`, the
//! HTTP boundary recovers the kind with [`ErrorClass::of`].

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific matchmaking scenarios
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatchmakingError {
    #[error("Player handle is required to perform matching")]
    PlayerHandleRequired,

    #[error("Game is required to perform matching")]
    GameRequired,

    #[error("Player with provided handle not found: {handle}")]
    PlayerNotFound { handle: String },

    #[error("The list of all players is null or empty")]
    PlayerListUnavailable,

    #[error("No players currently in queue for game: {game}")]
    EmptyQueueForGame { game: String },

    #[error("No matching players found, please try again later")]
    NoMatchingPlayersFound,

    #[error("Player store error: {message}")]
    StoreError { message: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal service error: {message}")]
    InternalError { message: String },
}

/// How the request boundary should treat a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Caller supplied bad or unknown input, or the player list is gone
    BadRequest,
    /// Legitimate empty result
    NoContent,
    /// Anything else
    Internal,
}

impl MatchmakingError {
    /// Classify this error for the request boundary
    pub fn class(&self) -> ErrorClass {
        match self {
            MatchmakingError::PlayerHandleRequired
            | MatchmakingError::GameRequired
            | MatchmakingError::PlayerNotFound { .. }
            | MatchmakingError::PlayerListUnavailable => ErrorClass::BadRequest,
            MatchmakingError::EmptyQueueForGame { .. }
            | MatchmakingError::NoMatchingPlayersFound => ErrorClass::NoContent,
            MatchmakingError::StoreError { .. }
            | MatchmakingError::ConfigurationError { .. }
            | MatchmakingError::InternalError { .. } => ErrorClass::Internal,
        }
    }

    /// Short label used for metrics and logs
    pub fn label(&self) -> &'static str {
        match self {
            MatchmakingError::PlayerHandleRequired => "player_handle_required",
            MatchmakingError::GameRequired => "game_required",
            MatchmakingError::PlayerNotFound { .. } => "player_not_found",
            MatchmakingError::PlayerListUnavailable => "player_list_unavailable",
            MatchmakingError::EmptyQueueForGame { .. } => "empty_queue_for_game",
            MatchmakingError::NoMatchingPlayersFound => "no_matching_players_found",
            MatchmakingError::StoreError { .. } => "store_error",
            MatchmakingError::ConfigurationError { .. } => "configuration_error",
            MatchmakingError::InternalError { .. } => "internal_error",
        }
    }
}

impl ErrorClass {
    /// Classify an arbitrary error; unknown error kinds are internal
    pub fn of(error: &anyhow::Error) -> Self {
        error
            .downcast_ref::<MatchmakingError>()
            .map(MatchmakingError::class)
            .unwrap_or(ErrorClass::Internal)
    }
}

/// Extract the matchmaking error kind from an `anyhow` error, if it is one
pub fn matchmaking_error(error: &anyhow::Error) -> Option<&MatchmakingError> {
    error.downcast_ref::<MatchmakingError>()
}
