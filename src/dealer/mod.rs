//! The dealer (game coordinator) and the game outcome it reports.

#[allow(clippy::module_inception)]
pub mod dealer;
pub mod outcome;

pub use dealer::{Dealer, StopHandle};
pub use outcome::GameOutcome;
