//! Waiting queue construction
//!
//! The queue is every stored player ranked in the requested game, minus the
//! requester. Players without a queue-entry instant get one sampled from the
//! injected [`TimeSource`].

use crate::error::{MatchmakingError, Result};
use crate::matching::clock::TimeSource;
use crate::matching::ranking::has_game_ranking;
use crate::types::Player;
use tracing::debug;

/// Build the queue of potential opponents for `requester` in `game`
pub fn build_queue(
    all_players: Vec<Player>,
    requester: &Player,
    game: &str,
    time_source: &dyn TimeSource,
) -> Result<Vec<Player>> {
    let mut queue: Vec<Player> = all_players
        .into_iter()
        .filter(|player| player.handle != requester.handle && has_game_ranking(player, game))
        .collect();

    if queue.is_empty() {
        return Err(MatchmakingError::EmptyQueueForGame {
            game: game.to_string(),
        }
        .into());
    }

    let now = time_source.now();
    let mut backfilled = 0;
    for player in queue.iter_mut().filter(|p| p.queued_from.is_none()) {
        player.queued_from = Some(time_source.sample_queue_entry(now));
        backfilled += 1;
    }

    debug!(
        "Built queue for '{}' in {}: {} players ({} backfilled)",
        requester.handle,
        game,
        queue.len(),
        backfilled
    );

    Ok(queue)
}
