//! Player identification and per-player score storage.
//!
//! ## PlayerId
//!
//! Type-safe player identifier supporting 1-255 players. Ids double as
//! the dealer's scan order: lower ids are validated first.
//!
//! ## PlayerMap
//!
//! Per-player data backed by a `Vec` for O(1) access, used for final
//! scores and anything else the dealer reports per seat.

use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Player identifier supporting 1-255 players.
///
/// Player indices are 0-based: the first player is `PlayerId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    ///
    /// ```
    /// use set_engine::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(3).collect();
    /// assert_eq!(players, vec![PlayerId::new(0), PlayerId::new(1), PlayerId::new(2)]);
    /// ```
    pub fn all(player_count: usize) -> impl DoubleEndedIterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-seat values indexed by `PlayerId`.
///
/// ```
/// use set_engine::core::{PlayerId, PlayerMap};
///
/// let scores: PlayerMap<u32> = PlayerMap::new(3, |p| if p.index() == 1 { 2 } else { 0 });
/// assert_eq!(scores[PlayerId::new(1)], 2);
/// assert_eq!(scores.leaders(), vec![PlayerId::new(1)]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Build one value per seat.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        Self {
            data: PlayerId::all(player_count).map(factory).collect(),
        }
    }

    pub fn with_default(player_count: usize) -> Self
    where
        T: Default,
    {
        Self::new(player_count, |_| T::default())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        PlayerId::all(self.data.len()).zip(self.data.iter())
    }
}

impl PlayerMap<u32> {
    /// Sum over all seats.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.data.iter().sum()
    }

    /// Highest value, or 0 for an empty map.
    #[must_use]
    pub fn top(&self) -> u32 {
        self.data.iter().copied().max().unwrap_or(0)
    }

    /// Every seat holding the highest value, lowest id first.
    #[must_use]
    pub fn leaders(&self) -> Vec<PlayerId> {
        let top = self.top();
        self.iter()
            .filter(|&(_, &v)| v == top)
            .map(|(p, _)| p)
            .collect()
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        &self.data[player.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_basics() {
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);

        assert_eq!(p0.index(), 0);
        assert_eq!(p1.index(), 1);
        assert!(p0 < p1);
        assert_eq!(format!("{}", p0), "Player 0");
    }

    #[test]
    fn test_player_id_all_reversed() {
        let players: Vec<_> = PlayerId::all(3).rev().collect();
        assert_eq!(players, vec![PlayerId::new(2), PlayerId::new(1), PlayerId::new(0)]);
    }

    #[test]
    fn test_player_map_scores() {
        let map: PlayerMap<u32> = PlayerMap::new(3, |p| [1, 0, 4][p.index()]);

        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs[0], (PlayerId::new(0), &1));
        assert_eq!(pairs[2], (PlayerId::new(2), &4));
        assert_eq!(map.len(), 3);
        assert_eq!(map.total(), 5);
        assert_eq!(map.top(), 4);
    }

    #[test]
    fn test_player_map_tied_leaders() {
        let map: PlayerMap<u32> = PlayerMap::new(4, |p| if p.index() % 2 == 0 { 3 } else { 1 });
        assert_eq!(map.leaders(), vec![PlayerId::new(0), PlayerId::new(2)]);

        let zeros: PlayerMap<u32> = PlayerMap::with_default(2);
        assert_eq!(zeros.leaders().len(), 2);
    }

    #[test]
    fn test_player_map_serialization() {
        let map: PlayerMap<u32> = PlayerMap::new(2, |p| p.index() as u32 + 1);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: PlayerMap<u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }

    #[test]
    #[should_panic(expected = "Must have at least 1 player")]
    fn test_player_map_zero_players() {
        let _: PlayerMap<u32> = PlayerMap::with_default(0);
    }
}
