//! Feature-matching validator.
//!
//! A group of `k` cards is a set when, on every feature dimension, the
//! cards either all share one value or all carry different values. Any
//! other split (two alike, one different) breaks the set.

use rustc_hash::FxHashSet;

use crate::cards::{CardId, FeatureSchema, Features};
use crate::core::GameConfig;

/// Stateless set checker for one feature schema and set arity.
///
/// ```
/// use set_engine::cards::{CardId, FeatureSchema};
/// use set_engine::rules::SetValidator;
///
/// let validator = SetValidator::new(FeatureSchema::new(4, 3), 3);
///
/// // (0,0,0,0), (1,1,1,1), (2,2,2,2): every dimension all different.
/// assert!(validator.test_set(&[CardId::new(0), CardId::new(40), CardId::new(80)]));
///
/// // (0,0,0,0), (0,0,0,1), (0,0,1,0): third dimension splits 2-1.
/// assert!(!validator.test_set(&[CardId::new(0), CardId::new(1), CardId::new(3)]));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetValidator {
    schema: FeatureSchema,
    set_size: usize,
}

impl SetValidator {
    #[must_use]
    pub fn new(schema: FeatureSchema, set_size: usize) -> Self {
        assert!(set_size >= 2, "set size must be at least 2");
        Self { schema, set_size }
    }

    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(FeatureSchema::from_config(config), config.set_size)
    }

    #[must_use]
    pub fn schema(&self) -> FeatureSchema {
        self.schema
    }

    #[must_use]
    pub fn set_size(&self) -> usize {
        self.set_size
    }

    /// Check whether exactly `set_size` cards form a set.
    ///
    /// Panics if called with any other number of cards.
    #[must_use]
    pub fn test_set(&self, cards: &[CardId]) -> bool {
        assert_eq!(
            cards.len(),
            self.set_size,
            "a set has exactly {} cards",
            self.set_size
        );
        let features: Vec<Features> = cards.iter().map(|&c| self.schema.features(c)).collect();
        self.features_form_set(&features)
    }

    fn features_form_set(&self, features: &[Features]) -> bool {
        let mut distinct = FxHashSet::default();
        (0..self.schema.feature_count).all(|dim| {
            distinct.clear();
            distinct.extend(features.iter().map(|f| f[dim]));
            distinct.len() == 1 || distinct.len() == self.set_size
        })
    }

    /// Find up to `limit` sets among `cards`.
    ///
    /// Subsets are visited in lexicographic index order, so the result is
    /// deterministic for a given input order.
    #[must_use]
    pub fn find_sets(&self, cards: &[CardId], limit: usize) -> Vec<Vec<CardId>> {
        let k = self.set_size;
        let mut found = Vec::new();
        if limit == 0 || cards.len() < k {
            return found;
        }

        let features: Vec<Features> = cards.iter().map(|&c| self.schema.features(c)).collect();
        let mut indices: Vec<usize> = (0..k).collect();
        let mut group: Vec<Features> = Vec::with_capacity(k);
        let n = cards.len();

        loop {
            group.clear();
            group.extend(indices.iter().map(|&i| features[i].clone()));
            if self.features_form_set(&group) {
                found.push(indices.iter().map(|&i| cards[i]).collect());
                if found.len() >= limit {
                    return found;
                }
            }

            // Advance to the next k-combination.
            let Some(pos) = (0..k).rev().find(|&i| indices[i] != i + n - k) else {
                return found;
            };
            indices[pos] += 1;
            for i in pos + 1..k {
                indices[i] = indices[i - 1] + 1;
            }
        }
    }

    /// Whether any `set_size`-subset of `cards` is a set.
    #[must_use]
    pub fn exists_set(&self, cards: &[CardId]) -> bool {
        !self.find_sets(cards, 1).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard() -> SetValidator {
        SetValidator::new(FeatureSchema::new(4, 3), 3)
    }

    fn card(features: [u8; 4]) -> CardId {
        FeatureSchema::new(4, 3).card(&features)
    }

    #[test]
    fn test_all_same_except_one_all_different() {
        let v = standard();
        assert!(v.test_set(&[card([0, 1, 2, 0]), card([1, 1, 2, 0]), card([2, 1, 2, 0])]));
    }

    #[test]
    fn test_two_one_split_is_invalid() {
        let v = standard();
        assert!(!v.test_set(&[card([0, 0, 0, 0]), card([0, 0, 0, 1]), card([0, 0, 1, 0])]));
    }

    #[test]
    #[should_panic(expected = "exactly 3 cards")]
    fn test_wrong_arity_panics() {
        let _ = standard().test_set(&[CardId::new(0), CardId::new(1)]);
    }

    #[test]
    fn test_full_deck_set_count() {
        // The 81-card deck contains 1080 sets.
        let v = standard();
        let deck: Vec<_> = (0..81).map(CardId::new).collect();
        assert_eq!(v.find_sets(&deck, usize::MAX).len(), 1080);
    }

    #[test]
    fn test_find_sets_respects_limit() {
        let v = standard();
        let deck: Vec<_> = (0..81).map(CardId::new).collect();
        assert_eq!(v.find_sets(&deck, 5).len(), 5);
        assert!(v.find_sets(&deck, 0).is_empty());
    }

    #[test]
    fn test_find_sets_too_few_cards() {
        let v = standard();
        assert!(v.find_sets(&[CardId::new(0), CardId::new(40)], 1).is_empty());
        assert!(!v.exists_set(&[]));
    }

    #[test]
    fn test_arity_four_with_four_values() {
        let v = SetValidator::new(FeatureSchema::new(2, 4), 4);
        let schema = v.schema();
        let cards: Vec<_> = (0..4).map(|i| schema.card(&[i, 2])).collect();
        assert!(v.test_set(&cards));

        let broken = [schema.card(&[0, 0]), schema.card(&[1, 0]), schema.card(&[2, 0]), schema.card(&[2, 1])];
        assert!(!v.test_set(&broken));
    }
}
