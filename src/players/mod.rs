//! Player agents and their input sources.
//!
//! - `player`: the per-seat thread, its verdict handoff and freezes
//! - `queue`: the bounded action queue feeding it
//! - `computer`: the synthetic key-press thread for computer players

pub mod computer;
pub mod player;
pub mod queue;

pub use player::{Player, PlayerSettings, PlayerState, Verdict};
pub use queue::{ActionQueue, Press};
