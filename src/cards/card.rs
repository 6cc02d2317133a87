//! Card identity and the feature schema that gives ids meaning.
//!
//! A card is nothing but an id. Its feature vector is the id written in
//! base `values_per_feature` with `feature_count` digits, most
//! significant digit first, so the standard 4x3 deck maps
//! `(a, b, c, d)` to `27a + 9b + 3c + d`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::GameConfig;

/// Feature values of a single card.
pub type Features = SmallVec<[u8; 8]>;

/// Unique identifier for a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Shape of the feature space: how many dimensions, how many values each.
///
/// ```
/// use set_engine::cards::{CardId, FeatureSchema};
///
/// let schema = FeatureSchema::new(4, 3);
/// assert_eq!(schema.features(CardId::new(40)).as_slice(), &[1, 1, 1, 1]);
/// assert_eq!(schema.card(&[0, 0, 1, 0]), CardId::new(3));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub feature_count: usize,
    pub values_per_feature: usize,
}

impl FeatureSchema {
    /// Panics if `values_per_feature` exceeds 256, the range of a `u8` digit.
    #[must_use]
    pub const fn new(feature_count: usize, values_per_feature: usize) -> Self {
        assert!(values_per_feature <= 256, "feature values must fit in a u8 digit");
        Self {
            feature_count,
            values_per_feature,
        }
    }

    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.feature_count, config.values_per_feature)
    }

    /// Decode a card id into its feature vector.
    #[must_use]
    pub fn features(&self, card: CardId) -> Features {
        let base = self.values_per_feature as u32;
        let mut rest = card.raw();
        let mut out: Features = SmallVec::from_elem(0, self.feature_count);
        for digit in out.iter_mut().rev() {
            *digit = (rest % base) as u8;
            rest /= base;
        }
        out
    }

    /// Encode a feature vector as a card id.
    ///
    /// Panics if the vector has the wrong length or a value is out of range.
    #[must_use]
    pub fn card(&self, features: &[u8]) -> CardId {
        assert_eq!(
            features.len(),
            self.feature_count,
            "expected {} features",
            self.feature_count
        );
        let base = self.values_per_feature as u32;
        let id = features.iter().fold(0u32, |acc, &value| {
            assert!((value as usize) < self.values_per_feature, "feature value {value} out of range");
            acc * base + u32::from(value)
        });
        CardId::new(id)
    }
}
