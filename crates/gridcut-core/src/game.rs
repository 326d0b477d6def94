//! Game orchestration: the board, the players and the round lifecycle.
//!
//! `Game` owns the shared [`Grid`] and every [`Player`]. Stepping is single
//! threaded: each step advances every player once, in registration order,
//! and each player sees the cuts and captures made by players before it in
//! the same step.
//!
//! # Round lifecycle
//!
//! ```text
//! Waiting --start--> Active --(win / end)--> Over --reset--> Waiting
//! ```
//!
//! Players may join or leave at any time. Joining while waiting spreads
//! everyone evenly over the spawn slots; joining mid-round places only the
//! newcomer. Leaving never removes cuts.
//!
//! # Determinism
//!
//! Given the same seed, the same joins and the same inputs, two games produce
//! identical boards, scores and events. The seeded RNG only picks marker
//! colors, so it never influences play.
//!
//! # Example
//!
//! ```
//! use gridcut_core::{Game, GameConfig, RoundStatus};
//!
//! let mut game = Game::new(GameConfig::default()).unwrap();
//! game.join_relayed("p1").unwrap();
//! game.start().unwrap();
//!
//! for _ in 0..10 {
//!     game.step();
//! }
//!
//! assert_eq!(game.tick(), 10);
//! assert_eq!(game.status(), RoundStatus::Active);
//! ```

use std::time::Duration;

use lattice::{Direction, EdgeId, Grid, GridError, Orientation};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, trace, warn};

use crate::animator::Animator;
use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::events::GameEvent;
use crate::input::{InputChannel, InputConfig, LocalInputChannel, RelayedInputChannel, RemoteInput};
use crate::player::{Motion, Player, PlayerId};
use crate::surface::{paint_board, Color, NullSurface, RenderSurface};

/// Phase of the current round.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundStatus {
    /// Gathering players
    Waiting,
    /// Players are moving
    Active,
    /// A result has been decided
    Over,
}

/// The whole game state.
#[derive(Debug)]
pub struct Game<S: RenderSurface = NullSurface> {
    config: GameConfig,
    grid: Grid,
    players: Vec<Player>,
    status: RoundStatus,
    participants: usize,
    tick: u64,
    rng: ChaCha8Rng,
    animator: Animator,
    events: Vec<GameEvent>,
    surface: S,
}

impl Game<NullSurface> {
    /// Creates a game that draws nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the board cannot
    /// be built.
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_surface(config, NullSurface)
    }
}

impl<S: RenderSurface> Game<S> {
    /// Creates a game drawing onto `surface`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the board cannot
    /// be built.
    pub fn with_surface(config: GameConfig, mut surface: S) -> Result<Self> {
        config.validate()?;
        let grid = Grid::build(
            config.h_divisions,
            config.v_divisions,
            config.cell_width(),
            config.cell_height(),
        )?;
        paint_board(&grid, &mut surface);
        info!(
            h = config.h_divisions,
            v = config.v_divisions,
            seed = config.seed,
            "game created"
        );

        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            animator: Animator::new(config.fps),
            config,
            grid,
            players: Vec::new(),
            status: RoundStatus::Waiting,
            participants: 0,
            tick: 0,
            events: Vec::new(),
            surface,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Configuration the game was built with.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The shared board.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The shared board, mutably. Intended for scenario setup.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Current round phase.
    #[must_use]
    pub fn status(&self) -> RoundStatus {
        self.status
    }

    /// Steps taken since the last reset.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Players in registration order.
    pub fn players(&self) -> impl Iterator<Item = &Player> + '_ {
        self.players.iter()
    }

    /// Number of joined players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Looks up a player.
    #[must_use]
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == id)
    }

    /// Looks up a player mutably.
    pub fn player_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id() == id)
    }

    /// Frame clock.
    #[must_use]
    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    /// Frame clock, mutably.
    pub fn animator_mut(&mut self) -> &mut Animator {
        &mut self.animator
    }

    /// Drawing target.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Drains recorded events in order.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // =========================================================================
    // Session surface
    // =========================================================================

    /// Adds a participant fed by `input`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::DuplicatePlayer`] if the id has already joined,
    /// or [`GameError::Grid`] if the board has no spawn edge for the
    /// newcomer.
    pub fn join(&mut self, id: impl Into<PlayerId>, input: Box<dyn InputChannel>) -> Result<()> {
        let id = id.into();
        if self.player(&id).is_some() {
            warn!(player = %id, "duplicate join rejected");
            return Err(GameError::DuplicatePlayer(id));
        }

        let count = self.players.len() + 1;
        let layout = if self.status == RoundStatus::Waiting {
            self.spawn_layout(count)?
        } else {
            vec![self.spawn_slot(count - 1, count)?]
        };

        let color = Color::rgb(self.rng.gen(), self.rng.gen(), self.rng.gen());
        let player = Player::new(id.clone(), input)
            .with_speed(self.config.player_speed)
            .with_health(self.config.initial_health)
            .with_color(color);
        self.players.push(player);

        if self.status == RoundStatus::Waiting {
            self.distribute(&layout);
        } else if let (Some(newcomer), Some(&(edge, direction))) =
            (self.players.last_mut(), layout.first())
        {
            newcomer.place(&mut self.grid, edge, direction);
        }

        info!(player = %id, players = self.players.len(), "player joined");
        self.events.push(GameEvent::PlayerJoined { player: id });
        Ok(())
    }

    /// Adds a participant driven by this machine's keyboard.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::DuplicatePlayer`] if the id has already joined.
    pub fn join_local(&mut self, id: impl Into<PlayerId>, mapping: InputConfig) -> Result<()> {
        let config = InputConfig {
            buffer_size: self.config.input_buffer_size,
            timeout_ms: self.config.input_timeout_ms,
            mapping: mapping.mapping,
        };
        self.join(id, Box::new(LocalInputChannel::new(config)))
    }

    /// Adds a participant whose arrow keys arrive through [`Game::relay`].
    ///
    /// # Errors
    ///
    /// Returns [`GameError::DuplicatePlayer`] if the id has already joined.
    pub fn join_relayed(&mut self, id: impl Into<PlayerId>) -> Result<()> {
        let id = id.into();
        let config = InputConfig {
            mapping: InputConfig::standard_arrows().mapping,
            ..self.config.input_config()
        };
        let channel = RelayedInputChannel::new(id.clone(), config);
        self.join(id, Box::new(channel))
    }

    /// Removes a participant. Their cuts stay on the board.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownPlayer`] if the id is not part of the game.
    pub fn leave(&mut self, id: &PlayerId) -> Result<Player> {
        let index = self
            .players
            .iter()
            .position(|p| p.id() == id)
            .ok_or_else(|| GameError::UnknownPlayer(id.clone()))?;
        let player = self.players.remove(index);

        info!(player = %id, players = self.players.len(), "player left");
        self.events.push(GameEvent::PlayerLeft { player: id.clone() });
        if self.status == RoundStatus::Active {
            self.settle();
        }
        Ok(player)
    }

    /// Delivers a relayed input message to whichever channel claims it.
    pub fn relay(&mut self, input: &RemoteInput) -> bool {
        let mut claimed = false;
        for player in &mut self.players {
            claimed |= player.input_mut().receive(input);
        }
        if !claimed {
            trace!(participant = %input.participant_id, "relayed input unclaimed");
        }
        claimed
    }

    /// Begins the round.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::RoundNotWaiting`] unless the round is waiting, and
    /// [`GameError::NoPlayers`] if nobody has joined.
    pub fn start(&mut self) -> Result<()> {
        if self.status != RoundStatus::Waiting {
            return Err(GameError::RoundNotWaiting(self.status));
        }
        if self.players.is_empty() {
            return Err(GameError::NoPlayers);
        }
        self.status = RoundStatus::Active;
        self.participants = self.players.len();
        self.animator.start();
        info!(players = self.participants, "round started");
        self.events.push(GameEvent::RoundStarted);
        Ok(())
    }

    /// Ends an active round without a winner.
    pub fn end(&mut self) {
        if self.status == RoundStatus::Active {
            self.finish(None);
        }
    }

    /// Clears the board and returns every player to a spawn slot.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Grid`] if the board has no spawn edge for one of
    /// the players. The game is left untouched in that case.
    pub fn reset(&mut self) -> Result<()> {
        let layout = self.spawn_layout(self.players.len())?;
        self.grid.reset();
        self.status = RoundStatus::Waiting;
        self.participants = 0;
        self.tick = 0;
        self.animator.stop();
        self.distribute(&layout);
        info!(players = self.players.len(), "round reset");
        Ok(())
    }

    // =========================================================================
    // Stepping
    // =========================================================================

    /// Advances every living player once. Does nothing unless the round is
    /// active.
    #[instrument(level = "debug", skip(self), fields(tick = self.tick))]
    pub fn step(&mut self) {
        if self.status != RoundStatus::Active {
            trace!(status = ?self.status, "step skipped");
            return;
        }

        let damage = self.config.crash_damage;
        for player in &mut self.players {
            let motion = player.advance(&mut self.grid, damage, &mut self.surface);
            Self::record(&mut self.events, player, &motion);
        }
        self.tick += 1;
        self.settle();
    }

    /// Feeds elapsed time to the animator and runs the steps it says are due.
    /// Returns the number of steps run.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        let due = self.animator.advance(elapsed);
        let mut ran = 0;
        for _ in 0..due {
            if self.status != RoundStatus::Active {
                break;
            }
            self.step();
            ran += 1;
        }
        ran
    }

    fn record(events: &mut Vec<GameEvent>, player: &Player, motion: &Motion) {
        let points = motion.points();
        if points > 0 {
            events.push(GameEvent::Captured {
                player: player.id().clone(),
                cells: points,
            });
            events.push(GameEvent::ScoreChanged {
                player: player.id().clone(),
                score: player.score(),
                delta: points,
            });
        }
        if let Some(crash) = motion.crash {
            events.push(GameEvent::Crashed {
                player: player.id().clone(),
                damage: crash.damage,
                health: crash.health,
            });
            if crash.is_fatal() {
                events.push(GameEvent::PlayerDead {
                    player: player.id().clone(),
                });
            }
        }
    }

    /// Ends the round if its outcome is decided.
    fn settle(&mut self) {
        if self.grid.is_fully_captured() {
            let leader = self.leader().map(|p| p.id().clone());
            self.finish(leader);
            return;
        }

        let mut alive = self.players.iter().filter(|p| p.is_alive());
        match (alive.next(), alive.next()) {
            (Some(last), None) if self.participants >= 2 => {
                let id = last.id().clone();
                self.finish(Some(id));
            }
            (None, _) => self.finish(None),
            _ => {}
        }
    }

    /// Highest scorer; the earliest to join wins ties.
    #[must_use]
    pub fn leader(&self) -> Option<&Player> {
        self.players
            .iter()
            .fold(None, |best: Option<&Player>, p| match best {
                Some(b) if b.score() >= p.score() => Some(b),
                _ => Some(p),
            })
    }

    fn finish(&mut self, winner: Option<PlayerId>) {
        if let Some(id) = &winner {
            info!(player = %id, "player wins");
            self.events.push(GameEvent::PlayerWins { player: id.clone() });
        }
        self.status = RoundStatus::Over;
        self.animator.stop();
        info!(winner = ?winner, tick = self.tick, "round ended");
        self.events.push(GameEvent::RoundEnded { winner });
    }

    // =========================================================================
    // Spawning
    // =========================================================================

    /// Spawn edge for player `index` of `count`.
    ///
    /// Players alternate between the top boundary (heading down) and the left
    /// boundary (heading right), evenly spaced along each.
    fn spawn_slot(&self, index: usize, count: usize) -> Result<(EdgeId, Direction)> {
        let slot = index / 2;
        let (h, v, orientation) = if index % 2 == 0 {
            let top_count = count.div_ceil(2);
            (Self::spread(slot, top_count, self.grid.h_divisions()), 0, Orientation::Vertical)
        } else {
            let left_count = count / 2;
            (0, Self::spread(slot, left_count, self.grid.v_divisions()), Orientation::Horizontal)
        };
        let edge = self
            .grid
            .edge_at(h, v, orientation)
            .ok_or(GridError::MissingEdge { h, v, orientation })?;
        Ok((edge, Direction::Forward))
    }

    /// Spawn edges for a round of `count` players, in join order.
    fn spawn_layout(&self, count: usize) -> Result<Vec<(EdgeId, Direction)>> {
        (0..count).map(|index| self.spawn_slot(index, count)).collect()
    }

    /// Position of slot `slot` of `count` evenly spread over `divisions`.
    #[allow(clippy::cast_possible_truncation)]
    fn spread(slot: usize, count: usize, divisions: u32) -> u32 {
        // Bounded by `divisions`, so the cast back is lossless.
        ((slot as u64 + 1) * u64::from(divisions) / (count as u64 + 1)) as u32
    }

    /// Clears every trail and respawns all players on `layout`.
    fn distribute(&mut self, layout: &[(EdgeId, Direction)]) {
        self.grid.clear_cuts();
        let health = self.config.initial_health;
        for (player, &(edge, direction)) in self.players.iter_mut().zip(layout) {
            player.respawn(&mut self.grid, edge, direction, health);
        }
        paint_board(&self.grid, &mut self.surface);
    }
}
