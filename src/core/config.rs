//! Game configuration.
//!
//! Every value the dealer and players need is carried by `GameConfig`:
//! seat counts, table and deck geometry, the set arity, and all timing
//! knobs. Configs are built in code with the `with_*` builders or loaded
//! from JSON; missing fields fall back to the standard 81-card game.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Players fed by an external input handler (ids `0..human_players`).
    pub human_players: usize,

    /// Players fed by a synthetic input thread (ids after the humans).
    pub computer_players: usize,

    /// Number of slots on the table.
    pub table_size: usize,

    /// Number of cards in the deck (ids `0..deck_size`).
    pub deck_size: usize,

    /// Cards per set, also the token capacity of each player.
    pub set_size: usize,

    /// Feature dimensions per card.
    pub feature_count: usize,

    /// Distinct values per feature dimension.
    pub values_per_feature: usize,

    /// Round length before the table is reshuffled.
    pub turn_timeout_ms: u64,

    /// Remaining time at which the countdown switches to warning.
    pub turn_timeout_warning_ms: u64,

    /// Freeze after a valid set.
    pub point_freeze_ms: u64,

    /// Freeze after an invalid set.
    pub penalty_freeze_ms: u64,

    /// Granularity of the visible freeze countdown.
    pub freeze_tick_ms: u64,

    /// Upper bound on every interruptible wait (dealer poll, queue pops).
    pub poll_interval_ms: u64,

    /// Mean delay between synthetic key presses.
    pub computer_delay_ms: u64,

    /// Pause after announcing the winners (used by the binary).
    pub end_game_pause_ms: u64,

    /// Seed for the deal and computer input. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            human_players: 0,
            computer_players: 2,
            table_size: 12,
            deck_size: 81,
            set_size: 3,
            feature_count: 4,
            values_per_feature: 3,
            turn_timeout_ms: 60_000,
            turn_timeout_warning_ms: 5_000,
            point_freeze_ms: 1_000,
            penalty_freeze_ms: 3_000,
            freeze_tick_ms: 1_000,
            poll_interval_ms: 100,
            computer_delay_ms: 20,
            end_game_pause_ms: 0,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document. Absent fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Set the number of human and computer players.
    #[must_use]
    pub fn with_players(mut self, human: usize, computer: usize) -> Self {
        self.human_players = human;
        self.computer_players = computer;
        self
    }

    /// Set table and deck sizes.
    #[must_use]
    pub fn with_table(mut self, table_size: usize, deck_size: usize) -> Self {
        self.table_size = table_size;
        self.deck_size = deck_size;
        self
    }

    /// Set the round timeout and its warning threshold.
    #[must_use]
    pub fn with_turn_timeout(mut self, timeout_ms: u64, warning_ms: u64) -> Self {
        self.turn_timeout_ms = timeout_ms;
        self.turn_timeout_warning_ms = warning_ms;
        self
    }

    /// Set point and penalty freeze lengths.
    #[must_use]
    pub fn with_freezes(mut self, point_ms: u64, penalty_ms: u64) -> Self {
        self.point_freeze_ms = point_ms;
        self.penalty_freeze_ms = penalty_ms;
        self
    }

    /// Set the freeze countdown tick.
    #[must_use]
    pub fn with_freeze_tick(mut self, tick_ms: u64) -> Self {
        self.freeze_tick_ms = tick_ms;
        self
    }

    /// Set the poll interval.
    #[must_use]
    pub fn with_poll_interval(mut self, poll_ms: u64) -> Self {
        self.poll_interval_ms = poll_ms;
        self
    }

    /// Set the synthetic key press delay.
    #[must_use]
    pub fn with_computer_delay(mut self, delay_ms: u64) -> Self {
        self.computer_delay_ms = delay_ms;
        self
    }

    /// Fix the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Total number of players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.human_players + self.computer_players
    }

    /// Number of distinct cards the feature schema can describe.
    #[must_use]
    pub fn max_deck_size(&self) -> usize {
        u32::try_from(self.feature_count)
            .ok()
            .and_then(|exp| self.values_per_feature.checked_pow(exp))
            .unwrap_or(usize::MAX)
    }

    #[must_use]
    pub fn turn_timeout(&self) -> Duration {
        Duration::from_millis(self.turn_timeout_ms)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[must_use]
    pub fn freeze_tick(&self) -> Duration {
        Duration::from_millis(self.freeze_tick_ms)
    }

    /// Check the configuration for values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        let players = self.player_count();
        if players == 0 {
            return invalid("at least one player is required".into());
        }
        if players > 255 {
            return invalid(format!("at most 255 players supported, got {players}"));
        }
        if self.set_size < 2 {
            return invalid(format!("set_size must be at least 2, got {}", self.set_size));
        }
        if self.table_size < self.set_size {
            return invalid(format!(
                "table_size ({}) must hold at least one set of {}",
                self.table_size, self.set_size
            ));
        }
        if self.feature_count == 0 {
            return invalid("feature_count must be at least 1".into());
        }
        if self.values_per_feature < 2 {
            return invalid(format!(
                "values_per_feature must be at least 2, got {}",
                self.values_per_feature
            ));
        }
        if self.values_per_feature > 256 {
            return invalid(format!(
                "values_per_feature ({}) exceeds 256, the range of a feature digit",
                self.values_per_feature
            ));
        }
        if u32::try_from(self.deck_size).is_err() || self.deck_size > self.max_deck_size() {
            return invalid(format!(
                "deck_size ({}) exceeds the {} distinct cards of a {}x{} schema",
                self.deck_size,
                self.max_deck_size(),
                self.feature_count,
                self.values_per_feature
            ));
        }
        if self.poll_interval_ms == 0 {
            return invalid("poll_interval_ms must be positive".into());
        }
        if self.freeze_tick_ms == 0 {
            return invalid("freeze_tick_ms must be positive".into());
        }
        if self.turn_timeout_warning_ms > self.turn_timeout_ms {
            return invalid(format!(
                "turn_timeout_warning_ms ({}) exceeds turn_timeout_ms ({})",
                self.turn_timeout_warning_ms, self.turn_timeout_ms
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_deck_size(), 81);
        assert_eq!(config.player_count(), 2);
    }

    #[test]
    fn test_builders() {
        let config = GameConfig::new()
            .with_players(1, 3)
            .with_table(9, 30)
            .with_turn_timeout(500, 100)
            .with_freezes(10, 20)
            .with_freeze_tick(5)
            .with_poll_interval(2)
            .with_computer_delay(1)
            .with_seed(11);

        assert_eq!(config.player_count(), 4);
        assert_eq!(config.table_size, 9);
        assert_eq!(config.deck_size, 30);
        assert_eq!(config.turn_timeout(), Duration::from_millis(500));
        assert_eq!(config.poll_interval(), Duration::from_millis(2));
        assert_eq!(config.freeze_tick(), Duration::from_millis(5));
        assert_eq!(config.seed, Some(11));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_no_players() {
        let err = GameConfig::new().with_players(0, 0).validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("at least one player")));
    }

    #[test]
    fn test_rejects_oversized_deck() {
        let config = GameConfig::new().with_table(12, 82);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_values_past_digit_range() {
        let wide = GameConfig {
            feature_count: 1,
            values_per_feature: 300,
            ..GameConfig::new().with_table(12, 300)
        };
        assert!(matches!(wide.validate(), Err(ConfigError::Invalid(msg)) if msg.contains("256")));

        let widest = GameConfig {
            feature_count: 1,
            values_per_feature: 256,
            ..GameConfig::new().with_table(12, 256)
        };
        assert!(widest.validate().is_ok());
    }

    #[test]
    fn test_rejects_small_table() {
        let config = GameConfig::new().with_table(2, 81);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_warning_past_timeout() {
        let config = GameConfig::new().with_turn_timeout(1_000, 2_000);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GameConfig::from_json_str(r#"{ "computer_players": 4, "seed": 3 }"#).unwrap();
        assert_eq!(config.computer_players, 4);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.table_size, 12);
    }

    #[test]
    fn test_json_round_trip() {
        let config = GameConfig::new().with_players(2, 1).with_seed(5);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(GameConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let err = GameConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
