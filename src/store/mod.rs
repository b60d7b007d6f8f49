//! Player persistence for the matchmaking service
//!
//! This module holds the read interface the matchmaker uses to look up
//! players, with in-memory, JSON document and mock implementations.

pub mod players;

// Re-export commonly used types
pub use players::{InMemoryPlayerStore, JsonFilePlayerStore, MockPlayerStore, PlayerStore};
