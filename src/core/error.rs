//! Error types.
//!
//! Gameplay itself has no error path: stale selections and invalid sets
//! are ordinary outcomes. Errors only come from loading configuration
//! and from managing the player threads.

use std::io;

use thiserror::Error;

use super::PlayerId;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to spawn thread: {0}")]
    Spawn(#[source] io::Error),
    #[error("{0} thread panicked")]
    PlayerPanicked(PlayerId),
}
