//! The dealer's pool of undealt cards.
//!
//! Only the dealer thread touches the deck, so it needs no locking.

use crate::core::GameRng;
use crate::rules::SetValidator;

use super::card::CardId;

/// Multiset of cards not currently on the table.
///
/// ```
/// use set_engine::cards::{CardId, Deck};
/// use set_engine::core::GameRng;
///
/// let mut deck = Deck::full(81);
/// let mut rng = GameRng::new(1);
///
/// let card = deck.take_random(&mut rng).unwrap();
/// assert_eq!(deck.len(), 80);
/// assert!(!deck.contains(card));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<CardId>,
}

impl Deck {
    /// Deck holding ids `0..size`.
    #[must_use]
    pub fn full(size: usize) -> Self {
        Self {
            cards: (0..size as u32).map(CardId::new).collect(),
        }
    }

    /// Deck holding exactly the given cards.
    #[must_use]
    pub fn from_cards(cards: Vec<CardId>) -> Self {
        Self { cards }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn contains(&self, card: CardId) -> bool {
        self.cards.contains(&card)
    }

    #[must_use]
    pub fn cards(&self) -> &[CardId] {
        &self.cards
    }

    /// Remove and return a uniformly chosen card, or `None` if empty.
    pub fn take_random(&mut self, rng: &mut GameRng) -> Option<CardId> {
        if self.cards.is_empty() {
            return None;
        }
        let index = rng.gen_index(self.cards.len());
        Some(self.cards.swap_remove(index))
    }

    /// Put cards back (round reset).
    pub fn return_all(&mut self, cards: impl IntoIterator<Item = CardId>) {
        self.cards.extend(cards);
    }

    /// Whether any `k`-subset of the remaining cards forms a set.
    #[must_use]
    pub fn exists_set(&self, validator: &SetValidator) -> bool {
        validator.exists_set(&self.cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::FeatureSchema;

    #[test]
    fn test_full_deck() {
        let deck = Deck::full(81);
        assert_eq!(deck.len(), 81);
        assert!(deck.contains(CardId::new(0)));
        assert!(deck.contains(CardId::new(80)));
        assert!(!deck.contains(CardId::new(81)));
    }

    #[test]
    fn test_take_until_empty() {
        let mut deck = Deck::full(5);
        let mut rng = GameRng::new(3);
        let mut drawn: Vec<_> = std::iter::from_fn(|| deck.take_random(&mut rng)).collect();

        assert!(deck.is_empty());
        assert_eq!(deck.take_random(&mut rng), None);

        drawn.sort();
        assert_eq!(drawn, (0..5).map(CardId::new).collect::<Vec<_>>());
    }

    #[test]
    fn test_return_all() {
        let mut deck = Deck::from_cards(vec![CardId::new(1)]);
        deck.return_all([CardId::new(7), CardId::new(9)]);
        assert_eq!(deck.len(), 3);
        assert!(deck.contains(CardId::new(9)));
    }

    #[test]
    fn test_same_seed_same_draws() {
        let draw = |seed| {
            let mut deck = Deck::full(81);
            let mut rng = GameRng::new(seed);
            (0..12).filter_map(|_| deck.take_random(&mut rng)).collect::<Vec<_>>()
        };
        assert_eq!(draw(17), draw(17));
    }

    #[test]
    fn test_exists_set() {
        let validator = SetValidator::new(FeatureSchema::new(4, 3), 3);
        assert!(Deck::full(81).exists_set(&validator));
        assert!(!Deck::from_cards(vec![CardId::new(0), CardId::new(1)]).exists_set(&validator));
    }
}
