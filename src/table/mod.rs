//! Shared table: slots, cards, and token claims.
//!
//! ## Key Types
//!
//! - `Table`: the fixed grid with one lock per slot
//! - `TokenSet`: the slots one player currently claims
//! - `TokenToggle`: what a player's key press did to the table

pub mod grid;
pub mod tokens;

pub use grid::{Claim, Table, TokenToggle};
pub use tokens::{Slots, TokenSet};
