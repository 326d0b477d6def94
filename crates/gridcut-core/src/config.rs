//! Game configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::input::InputConfig;

/// Tunables for one game. Missing JSON fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Cells across
    pub h_divisions: u32,
    /// Cells down
    pub v_divisions: u32,
    /// Board width in pixels
    pub width: u32,
    /// Board height in pixels
    pub height: u32,
    /// Pixels travelled per step, capped at the smaller cell dimension
    pub player_speed: u32,
    /// Health lost per crash
    pub crash_damage: u32,
    /// Health at spawn
    pub initial_health: u32,
    /// Symbols each player's input channel retains
    pub input_buffer_size: usize,
    /// Input inactivity timeout in milliseconds
    pub input_timeout_ms: u64,
    /// Steps per second when driven by the animator
    pub fps: u32,
    /// Master seed
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            h_divisions: 10,
            v_divisions: 10,
            width: 500,
            height: 500,
            player_speed: 7,
            crash_damage: 5,
            initial_health: 100,
            input_buffer_size: 1,
            input_timeout_ms: 3000,
            fps: 15,
            seed: 0,
        }
    }
}

impl GameConfig {
    /// Default config with a different board.
    #[must_use]
    pub fn with_board(h_divisions: u32, v_divisions: u32, width: u32, height: u32) -> Self {
        Self {
            h_divisions,
            v_divisions,
            width,
            height,
            ..Default::default()
        }
    }

    /// Parses a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::MalformedConfig`] if the document does not parse.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(GameError::MalformedConfig)
    }

    /// Checks that the values describe a playable game.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.h_divisions == 0 || self.v_divisions == 0 {
            return Err(GameError::InvalidConfig(format!(
                "board must have at least one cell, got {}x{}",
                self.h_divisions, self.v_divisions
            )));
        }
        if self.width < self.h_divisions || self.height < self.v_divisions {
            return Err(GameError::InvalidConfig(format!(
                "{}x{} pixels cannot hold {}x{} cells",
                self.width, self.height, self.h_divisions, self.v_divisions
            )));
        }
        if self.input_buffer_size == 0 {
            return Err(GameError::InvalidConfig(
                "input_buffer_size must be at least 1".into(),
            ));
        }
        if self.fps == 0 {
            return Err(GameError::InvalidConfig("fps must be at least 1".into()));
        }
        Ok(())
    }

    /// Cell width in pixels (board width split evenly, remainder dropped).
    #[must_use]
    pub fn cell_width(&self) -> u32 {
        self.width.checked_div(self.h_divisions).unwrap_or(0)
    }

    /// Cell height in pixels.
    #[must_use]
    pub fn cell_height(&self) -> u32 {
        self.height.checked_div(self.v_divisions).unwrap_or(0)
    }

    /// Channel settings derived from this config, with no mapping.
    #[must_use]
    pub fn input_config(&self) -> InputConfig {
        InputConfig {
            buffer_size: self.input_buffer_size,
            timeout_ms: self.input_timeout_ms,
            ..InputConfig::default()
        }
    }

    /// Time between animator frames.
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_standard_board() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cell_width(), 50);
        assert_eq!(config.cell_height(), 50);
        assert_eq!(config.player_speed, 7);
        assert_eq!(config.crash_damage, 5);
        assert_eq!(config.initial_health, 100);
    }

    #[test]
    fn cell_size_drops_remainder() {
        let config = GameConfig::with_board(3, 4, 100, 50);
        assert_eq!(config.cell_width(), 33);
        assert_eq!(config.cell_height(), 12);
    }

    #[test]
    fn json_fills_missing_fields() {
        let config = GameConfig::from_json(r#"{"h_divisions": 4, "seed": 9}"#).unwrap();
        assert_eq!(config.h_divisions, 4);
        assert_eq!(config.v_divisions, 10);
        assert_eq!(config.seed, 9);
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = GameConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, GameError::MalformedConfig(_)));
    }

    #[test]
    fn validate_rejects_unplayable_values() {
        let zero = GameConfig::with_board(0, 5, 100, 100);
        assert!(matches!(zero.validate(), Err(GameError::InvalidConfig(_))));

        let cramped = GameConfig::with_board(20, 20, 10, 10);
        assert!(cramped.validate().is_err());

        let config = GameConfig {
            input_buffer_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GameConfig {
            fps: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn derived_settings() {
        let config = GameConfig::default();
        let input = config.input_config();
        assert_eq!(input.buffer_size, 1);
        assert_eq!(input.timeout_ms, 3000);
        assert_eq!(config.frame_interval(), Duration::from_secs(1) / 15);
    }
}
