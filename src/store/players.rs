//! Player store interface and implementations
//!
//! The matchmaker only ever reads through this interface: one lookup by
//! handle and one fetch of the whole collection. An absent collection
//! (`Ok(None)`) is distinct from an empty one.

use crate::error::MatchmakingError;
use crate::types::Player;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use tracing::{debug, warn};

/// Trait for player store read operations
#[async_trait]
pub trait PlayerStore: Send + Sync {
    /// Get the player with the given handle
    async fn get_by_handle(&self, handle: &str) -> crate::error::Result<Option<Player>>;

    /// Get every stored player, or `None` if the collection cannot be supplied
    async fn get_all(&self) -> crate::error::Result<Option<Vec<Player>>>;
}

/// In-memory player store, iteration follows insertion order
#[derive(Debug, Default)]
pub struct InMemoryPlayerStore {
    players: RwLock<Vec<Player>>,
}

impl InMemoryPlayerStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given players
    pub fn with_players(players: Vec<Player>) -> Self {
        Self {
            players: RwLock::new(players),
        }
    }

    /// Insert a player, replacing any stored player with the same handle in place
    pub fn upsert(&self, player: Player) -> crate::error::Result<()> {
        let mut players =
            self.players
                .write()
                .map_err(|_| MatchmakingError::InternalError {
                    message: "Failed to acquire players write lock".to_string(),
                })?;

        match players.iter_mut().find(|p| p.handle == player.handle) {
            Some(existing) => *existing = player,
            None => players.push(player),
        }

        Ok(())
    }

    /// Remove a player, returning whether it existed
    pub fn remove(&self, handle: &str) -> crate::error::Result<bool> {
        let mut players =
            self.players
                .write()
                .map_err(|_| MatchmakingError::InternalError {
                    message: "Failed to acquire players write lock".to_string(),
                })?;

        let before = players.len();
        players.retain(|p| p.handle != handle);
        Ok(players.len() != before)
    }

    /// Number of stored players
    pub fn len(&self) -> crate::error::Result<usize> {
        let players = self
            .players
            .read()
            .map_err(|_| MatchmakingError::InternalError {
                message: "Failed to acquire players read lock".to_string(),
            })?;

        Ok(players.len())
    }

    pub fn is_empty(&self) -> crate::error::Result<bool> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl PlayerStore for InMemoryPlayerStore {
    async fn get_by_handle(&self, handle: &str) -> crate::error::Result<Option<Player>> {
        let players = self
            .players
            .read()
            .map_err(|_| MatchmakingError::InternalError {
                message: "Failed to acquire players read lock".to_string(),
            })?;

        Ok(players.iter().find(|p| p.handle == handle).cloned())
    }

    async fn get_all(&self) -> crate::error::Result<Option<Vec<Player>>> {
        let players = self
            .players
            .read()
            .map_err(|_| MatchmakingError::InternalError {
                message: "Failed to acquire players read lock".to_string(),
            })?;

        Ok(Some(players.clone()))
    }
}

/// Player store backed by a JSON document holding an array of players.
/// The document is re-read on every call, so edits show up without a restart.
#[derive(Debug, Clone)]
pub struct JsonFilePlayerStore {
    path: PathBuf,
}

impl JsonFilePlayerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the collection, `None` when the document does not exist
    async fn load(&self) -> crate::error::Result<Option<Vec<Player>>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Player collection not found at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(MatchmakingError::StoreError {
                    message: format!("Failed to read {}: {}", self.path.display(), e),
                }
                .into())
            }
        };

        let records: Vec<serde_json::Value> =
            serde_json::from_str(&contents).map_err(|e| MatchmakingError::StoreError {
                message: format!("Malformed player collection {}: {}", self.path.display(), e),
            })?;

        // A bad record only takes itself out of the collection
        let total = records.len();
        let players: Vec<Player> = records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value(record) {
                Ok(player) => Some(player),
                Err(e) => {
                    warn!(
                        "Skipping malformed player record {} in {}: {}",
                        index,
                        self.path.display(),
                        e
                    );
                    None
                }
            })
            .collect();

        debug!(
            "Loaded {} of {} players from {}",
            players.len(),
            total,
            self.path.display()
        );

        Ok(Some(players))
    }
}

#[async_trait]
impl PlayerStore for JsonFilePlayerStore {
    async fn get_by_handle(&self, handle: &str) -> crate::error::Result<Option<Player>> {
        Ok(self
            .load()
            .await?
            .and_then(|players| players.into_iter().find(|p| p.handle == handle)))
    }

    async fn get_all(&self) -> crate::error::Result<Option<Vec<Player>>> {
        self.load().await
    }
}

/// Mock player store for testing
#[derive(Debug, Default)]
pub struct MockPlayerStore {
    players: Vec<Player>,
    list_unavailable: bool,
    failure: Option<String>,
    get_by_handle_calls: AtomicUsize,
    get_all_calls: AtomicUsize,
}

impl MockPlayerStore {
    pub fn new(players: Vec<Player>) -> Self {
        Self {
            players,
            ..Self::default()
        }
    }

    /// Make `get_all` report the collection as unavailable
    pub fn with_list_unavailable(mut self) -> Self {
        self.list_unavailable = true;
        self
    }

    /// Make every call fail with a store error
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Number of `get_by_handle` calls made (for testing)
    pub fn get_by_handle_calls(&self) -> usize {
        self.get_by_handle_calls.load(Ordering::SeqCst)
    }

    /// Number of `get_all` calls made (for testing)
    pub fn get_all_calls(&self) -> usize {
        self.get_all_calls.load(Ordering::SeqCst)
    }

    /// Total number of store calls made (for testing)
    pub fn total_calls(&self) -> usize {
        self.get_by_handle_calls() + self.get_all_calls()
    }

    fn check_failure(&self) -> crate::error::Result<()> {
        match &self.failure {
            Some(message) => Err(MatchmakingError::StoreError {
                message: message.clone(),
            }
            .into()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PlayerStore for MockPlayerStore {
    async fn get_by_handle(&self, handle: &str) -> crate::error::Result<Option<Player>> {
        self.get_by_handle_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self.players.iter().find(|p| p.handle == handle).cloned())
    }

    async fn get_all(&self) -> crate::error::Result<Option<Vec<Player>>> {
        self.get_all_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        if self.list_unavailable {
            return Ok(None);
        }
        Ok(Some(self.players.clone()))
    }
}
