//! # set-engine
//!
//! A concurrent engine for the Set card-matching game.
//!
//! One dealer thread and one thread per player share a grid of card
//! slots. Players race to mark `set_size` cards with their tokens; the
//! dealer judges each full selection, awards points or penalties, and
//! refills the grid from the deck.
//!
//! ## Concurrency Model
//!
//! - **Per-slot locks**: every slot (card plus claimant) and every
//!   player's token set sits behind its own mutex. No operation holds
//!   two slot locks at once.
//!
//! - **Bounded input**: key presses go through a per-player queue of
//!   capacity `set_size`. Presses are dropped while the player is frozen.
//!
//! - **Verdict handoff**: a player with a full selection blocks until the
//!   dealer delivers `Point`, `Penalty`, or `Stale`.
//!
//! - **Input gate**: closed while the dealer deals or sweeps the table,
//!   so no token lands on a half-dealt grid.
//!
//! ## Modules
//!
//! - `core`: players, configuration, RNG, errors, sync primitives
//! - `cards`: card ids, feature decoding, the deck
//! - `rules`: the set validator
//! - `table`: the shared grid and per-player tokens
//! - `players`: player threads, action queues, computer input
//! - `dealer`: round loop, judging, shutdown, game outcome
//! - `ui`: display notifications

pub mod core;
pub mod cards;
pub mod rules;
pub mod table;
pub mod ui;
pub mod players;
pub mod dealer;

// Re-export commonly used types
pub use crate::core::{
    ConfigError, GameConfig, GameError, GameRng, Gate, GatePass, PlayerId, PlayerMap, Signal,
};

pub use crate::cards::{CardId, Deck, FeatureSchema, Features};

pub use crate::rules::SetValidator;

pub use crate::table::{Claim, Slots, Table, TokenSet, TokenToggle};

pub use crate::players::{ActionQueue, Player, PlayerSettings, PlayerState, Press, Verdict};

pub use crate::dealer::{Dealer, GameOutcome, StopHandle};

pub use crate::ui::{LoggingUi, NullUi, RecordingUi, UiEvent, UserInterface};
