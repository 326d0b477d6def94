//! Events the game surfaces to the session layer.
//!
//! The game appends events while stepping and the session drains them with
//! [`Game::take_events`](crate::game::Game::take_events) to relay onward.
//! Events serialize to tagged JSON (`{"type": "scoreChanged", ...}`).

use serde::Serialize;

use crate::player::PlayerId;

/// Something observable that happened during a step or a lifecycle call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    /// A participant joined.
    PlayerJoined {
        /// Who
        player: PlayerId,
    },
    /// A participant left. Their cuts remain on the board.
    PlayerLeft {
        /// Who
        player: PlayerId,
    },
    /// A round began.
    RoundStarted,
    /// A loop closed and enclosed unclaimed cells.
    Captured {
        /// Who closed it
        player: PlayerId,
        /// Cells newly captured
        cells: usize,
    },
    /// A player's score changed.
    ScoreChanged {
        /// Whose
        player: PlayerId,
        /// New total
        score: usize,
        /// Points added
        delta: usize,
    },
    /// A player entered an edge between two captured cells.
    Crashed {
        /// Who
        player: PlayerId,
        /// Health lost
        damage: u32,
        /// Health remaining
        health: u32,
    },
    /// A player's health reached zero.
    PlayerDead {
        /// Who
        player: PlayerId,
    },
    /// A player won the round.
    PlayerWins {
        /// Who
        player: PlayerId,
    },
    /// The round ended.
    RoundEnded {
        /// Winner, if the round produced one
        winner: Option<PlayerId>,
    },
}

impl GameEvent {
    /// The player the event concerns, if any.
    #[must_use]
    pub fn player(&self) -> Option<&PlayerId> {
        match self {
            Self::PlayerJoined { player }
            | Self::PlayerLeft { player }
            | Self::Captured { player, .. }
            | Self::ScoreChanged { player, .. }
            | Self::Crashed { player, .. }
            | Self::PlayerDead { player }
            | Self::PlayerWins { player } => Some(player),
            Self::RoundEnded { winner } => winner.as_ref(),
            Self::RoundStarted => None,
        }
    }
}
