//! Builders and stepping utilities shared by the game-level tests.

use std::sync::Arc;

use crate::game::{Game, RoundStatus};
use crate::input::{InputConfig, LocalInputChannel, ManualClock, RemoteInput};
use crate::player::{Player, PlayerId};
use crate::surface::RenderSurface;
use crate::GameConfig;

/// Routes `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Default 10x10 game on a 500px board.
pub fn standard_game() -> Game {
    init_tracing();
    Game::new(GameConfig::default()).expect("default config is valid")
}

/// Game with the given board and default tunables.
pub fn board_game(h: u32, v: u32, width: u32, height: u32) -> Game {
    init_tracing();
    Game::new(GameConfig::with_board(h, v, width, height)).expect("board is valid")
}

/// Joins a locally driven player whose input decays on `clock`.
pub fn join_with_clock<S: RenderSurface>(game: &mut Game<S>, id: &str, clock: &Arc<ManualClock>) {
    let config = InputConfig {
        timeout_ms: game.config().input_timeout_ms,
        ..InputConfig::standard_arrows()
    };
    let channel = LocalInputChannel::with_clock(config, clock.clone());
    game.join(id, Box::new(channel)).expect("fresh id");
}

/// Looks up a player that must exist.
pub fn player<'a, S: RenderSurface>(game: &'a Game<S>, id: &str) -> &'a Player {
    game.player(&PlayerId::new(id)).expect("player joined")
}

/// Steps until `id` leaves its current edge or the round stops.
pub fn step_to_vertex<S: RenderSurface>(game: &mut Game<S>, id: &str) {
    let start = player(game, id).edge();
    for _ in 0..100 {
        game.step();
        if game.status() != RoundStatus::Active || player(game, id).edge() != start {
            return;
        }
    }
    panic!("{id} never reached a vertex");
}

/// Presses an arrow key for `id` through the relay, then steps to the next
/// vertex so the turn is taken there.
pub fn steer<S: RenderSurface>(game: &mut Game<S>, id: &str, arrow: &str) {
    assert!(game.relay(&RemoteInput::down(id, arrow)), "{id} has no relayed channel");
    step_to_vertex(game, id);
}
