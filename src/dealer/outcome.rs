//! Final result of a game.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::{PlayerId, PlayerMap};

/// Scores and winners once every player thread has stopped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    /// Every player holding the top score, in ascending id order.
    pub winners: Vec<PlayerId>,
    /// Final score per player.
    pub scores: PlayerMap<u32>,
    /// Cards removed from the game by valid sets, in removal order.
    pub removed: Vec<CardId>,
    /// Cards left in the deck.
    pub remaining: Vec<CardId>,
    /// Completed rounds (full deal to reshuffle).
    pub rounds: usize,
}

impl GameOutcome {
    #[must_use]
    pub fn new(
        scores: PlayerMap<u32>,
        removed: Vec<CardId>,
        remaining: Vec<CardId>,
        rounds: usize,
    ) -> Self {
        Self {
            winners: scores.leaders(),
            scores,
            removed,
            remaining,
            rounds,
        }
    }

    /// Check if a player won (ties produce several winners).
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        self.winners.contains(&player)
    }

    #[must_use]
    pub fn top_score(&self) -> u32 {
        self.scores.top()
    }

    /// Points awarded over the whole game.
    #[must_use]
    pub fn total_points(&self) -> u32 {
        self.scores.total()
    }
}
