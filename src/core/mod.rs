//! Core engine types: player ids, configuration, RNG, errors, and the
//! blocking primitives the dealer and players coordinate through.

pub mod config;
pub mod error;
pub mod player;
pub mod rng;
pub mod sync;

pub use config::GameConfig;
pub use error::{ConfigError, GameError};
pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
pub use sync::{Gate, GatePass, Signal};
