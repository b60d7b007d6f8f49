//! Per-game ranking lookup

use crate::types::{GameRanking, Player};

/// The player's ranking for `game`. When several exist the first one wins.
pub fn game_ranking<'a>(player: &'a Player, game: &str) -> Option<&'a GameRanking> {
    player.rankings.iter().find(|ranking| ranking.game == game)
}

/// Whether the player holds any ranking for `game`
pub fn has_game_ranking(player: &Player, game: &str) -> bool {
    game_ranking(player, game).is_some()
}

/// The player's ranking for `game`, appending an unranked one in memory first
/// if the player has none
pub fn ensure_game_ranking<'a>(player: &'a mut Player, game: &str) -> &'a GameRanking {
    let index = match player.rankings.iter().position(|r| r.game == game) {
        Some(index) => index,
        None => {
            player.rankings.push(GameRanking::unranked(game));
            player.rankings.len() - 1
        }
    };
    &player.rankings[index]
}
