//! # Gridcut Core
//!
//! Game logic for a multiplayer edge-following territory game.
//!
//! Players ride the edges of a rectangular [`lattice::Grid`], cutting every
//! edge they travel. Closing a loop of cuts captures the unclaimed cells it
//! encloses and scores one point per cell. Riding an edge with captured cells
//! on both sides costs health.
//!
//! ## Architecture
//!
//! - **[`input`]**: buffered, decaying steering channels fed by a keyboard or
//!   by relayed network messages
//! - **[`player`]**: per-step motion, turning, loop closure and crashes
//! - **[`game`]**: the shared board, join/leave, round lifecycle and win rules
//! - **[`surface`]**: the two drawing layers players and the board paint onto
//! - **[`animator`]**: fixed-rate frame clock that schedules steps
//!
//! The game core performs no I/O. Sessions feed it [`RemoteInput`] messages,
//! call [`Game::step`] (directly or through [`Game::advance`]) and drain
//! [`GameEvent`]s to relay onward.
//!
//! ## Usage
//!
//! ```
//! use gridcut_core::{Game, GameConfig, GameEvent, RemoteInput};
//!
//! let mut game = Game::new(GameConfig::default()).unwrap();
//! game.join_relayed("alice").unwrap();
//! game.join_relayed("bob").unwrap();
//! game.start().unwrap();
//!
//! game.relay(&RemoteInput::down("alice", "ArrowRight"));
//! for _ in 0..20 {
//!     game.step();
//! }
//!
//! let events = game.take_events();
//! assert!(matches!(events[0], GameEvent::PlayerJoined { .. }));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub use lattice;

pub mod animator;
pub mod config;
pub mod error;
pub mod events;
pub mod game;
pub mod input;
pub mod player;
pub mod surface;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use animator::Animator;
pub use config::GameConfig;
pub use error::{GameError, InputError, Result};
pub use events::GameEvent;
pub use game::{Game, RoundStatus};
pub use input::{
    Clock, InputBuffer, InputChannel, InputConfig, InputKind, LocalInputChannel, ManualClock,
    RelayedInputChannel, RemoteInput, Symbol, SystemClock, Turn,
};
pub use player::{Crash, Motion, Player, PlayerId};
pub use surface::{Canvas, Color, Layer, NullSurface, RenderSurface};
