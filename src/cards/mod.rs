//! Card system: identities, the feature schema, and the dealer's deck.
//!
//! ## Key Types
//!
//! - `CardId`: opaque card identifier
//! - `FeatureSchema`: maps ids to feature vectors
//! - `Deck`: the pool of undealt cards, owned by the dealer

pub mod card;
pub mod deck;

pub use card::{CardId, FeatureSchema, Features};
pub use deck::Deck;
