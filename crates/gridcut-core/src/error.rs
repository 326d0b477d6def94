//! Error types for the game layer.
//!
//! Topology errors come from [`lattice`] and are wrapped. Everything that can
//! go wrong while a round is running is an absence (`Option`) rather than an
//! error, so a round is only ever rejected at setup time.

use lattice::GridError;
use thiserror::Error;

use crate::game::RoundStatus;
use crate::player::PlayerId;

/// Game result type
pub type Result<T> = std::result::Result<T, GameError>;

/// Errors surfaced to the session layer.
#[derive(Debug, Error)]
pub enum GameError {
    /// The board could not be built.
    #[error("grid construction failed: {0}")]
    Grid(#[from] GridError),

    /// A participant tried to join twice.
    #[error("player {0} has already joined")]
    DuplicatePlayer(PlayerId),

    /// A participant id that is not part of the game.
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),

    /// A round cannot start without participants.
    #[error("cannot start a round with no players")]
    NoPlayers,

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration document could not be parsed.
    #[error("malformed configuration: {0}")]
    MalformedConfig(#[source] serde_json::Error),

    /// `start` was called on a round that is not waiting.
    #[error("round is {0:?}, expected Waiting")]
    RoundNotWaiting(RoundStatus),
}

/// Errors decoding relayed input.
#[derive(Debug, Error)]
pub enum InputError {
    /// The payload was not a valid input message.
    #[error("malformed input message: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_errors_convert() {
        let err: GameError = GridError::InvalidDimensions {
            h_divisions: 0,
            v_divisions: 3,
        }
        .into();
        assert!(matches!(err, GameError::Grid(_)));
        assert!(err.to_string().contains("0x3"));
    }

    #[test]
    fn duplicate_player_names_the_id() {
        let err = GameError::DuplicatePlayer(PlayerId::new("alice"));
        assert_eq!(err.to_string(), "player alice has already joined");
    }

    #[test]
    fn round_status_is_reported() {
        let err = GameError::RoundNotWaiting(RoundStatus::Active);
        assert_eq!(err.to_string(), "round is Active, expected Waiting");
    }
}
