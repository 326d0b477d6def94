//! Players and edge-following motion.
//!
//! A player always sits on one edge of the lattice, `offset` pixels from the
//! vertex it entered through. Each step it advances by its speed (capped at
//! the smaller cell dimension, so at most one vertex is crossed per step).
//!
//! # Crossing a vertex
//!
//! When the offset passes the end of the edge, in this order:
//!
//! 1. If the arrival vertex has cuts across the direction of travel, the
//!    trail may have closed a loop: trace it and capture what it encloses.
//! 2. If the most recent buffered input is a turn perpendicular to the
//!    current edge and the vertex has an edge on that side, take it.
//!    Otherwise continue straight, wrapping to the opposite boundary at the
//!    edge of the board.
//! 3. Carry the overflow onto the new edge, cut it, and check for a crash:
//!    entering an edge whose cells on both sides are already captured costs
//!    health.

use std::fmt;

use glam::UVec2;
use lattice::{Capture, CellId, Direction, EdgeId, Grid, VertexId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::input::{InputChannel, Turn};
use crate::surface::{paint_cells, Color, Layer, RenderSurface};

/// Default pixels travelled per step.
pub const DEFAULT_SPEED: u32 = 7;
/// Default health at spawn.
pub const DEFAULT_HEALTH: u32 = 100;
/// Default health lost per crash.
pub const DEFAULT_CRASH_DAMAGE: u32 = 5;

// =============================================================================
// PlayerId
// =============================================================================

/// Participant identifier assigned by the session layer.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Creates an id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlayerId({})", self.0)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// =============================================================================
// Step outcome
// =============================================================================

/// Damage taken on entering an edge between two captured cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crash {
    /// The captured cells on either side of the edge
    pub cells: [CellId; 2],
    /// Health lost
    pub damage: u32,
    /// Health remaining
    pub health: u32,
}

impl Crash {
    /// True if the crash took the last of the player's health.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        self.health == 0
    }
}

/// What happened to a player during one step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Motion {
    /// Vertex crossed, if the player left its edge
    pub crossed: Option<VertexId>,
    /// Turn taken at that vertex
    pub turned: Option<Turn>,
    /// Result of a traced loop, if one closed
    pub capture: Option<Capture>,
    /// Crash on the newly entered edge
    pub crash: Option<Crash>,
}

impl Motion {
    /// Points earned this step.
    #[must_use]
    pub fn points(&self) -> usize {
        self.capture.as_ref().map_or(0, Capture::score)
    }
}

// =============================================================================
// Player
// =============================================================================

/// One participant's avatar: position on the lattice, trail and state.
#[derive(Debug)]
pub struct Player {
    id: PlayerId,
    input: Box<dyn InputChannel>,
    edge: Option<EdgeId>,
    direction: Direction,
    offset: u32,
    speed: u32,
    health: u32,
    score: usize,
    alive: bool,
    color: Color,
    last_position: UVec2,
}

impl Player {
    /// Creates an unplaced player with default speed and health.
    #[must_use]
    pub fn new(id: impl Into<PlayerId>, input: Box<dyn InputChannel>) -> Self {
        Self {
            id: id.into(),
            input,
            edge: None,
            direction: Direction::Forward,
            offset: 0,
            speed: DEFAULT_SPEED,
            health: DEFAULT_HEALTH,
            score: 0,
            alive: true,
            color: Color::YELLOW,
            last_position: UVec2::ZERO,
        }
    }

    /// Sets the per-step speed.
    #[must_use]
    pub fn with_speed(mut self, speed: u32) -> Self {
        self.speed = speed;
        self
    }

    /// Sets the starting health.
    #[must_use]
    pub fn with_health(mut self, health: u32) -> Self {
        self.health = health;
        self.alive = health > 0;
        self
    }

    /// Sets the marker color.
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Participant id.
    #[must_use]
    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    /// Current edge, once placed.
    #[must_use]
    pub fn edge(&self) -> Option<EdgeId> {
        self.edge
    }

    /// Travel direction along the current edge.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Pixels travelled along the current edge.
    #[must_use]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Pixels per step before capping.
    #[must_use]
    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// Remaining health.
    #[must_use]
    pub fn health(&self) -> u32 {
        self.health
    }

    /// Cells captured this round.
    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    /// False once health reaches zero.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Marker color.
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Input channel.
    #[must_use]
    pub fn input(&self) -> &dyn InputChannel {
        self.input.as_ref()
    }

    /// Input channel, mutably.
    pub fn input_mut(&mut self) -> &mut dyn InputChannel {
        self.input.as_mut()
    }

    /// Pixel position, once placed.
    #[must_use]
    pub fn position(&self, grid: &Grid) -> Option<UVec2> {
        self.edge
            .map(|edge| grid.edge_position(edge, self.direction, self.offset))
    }

    // -------------------------------------------------------------------------
    // State changes
    // -------------------------------------------------------------------------

    /// Puts the player at the start of `edge` heading `direction` and cuts it.
    pub fn place(&mut self, grid: &mut Grid, edge: EdgeId, direction: Direction) {
        self.enter(grid, edge, Some(direction));
        self.last_position = grid.edge_position(edge, direction, 0);
    }

    /// Restores round-start state and places the player.
    pub fn respawn(&mut self, grid: &mut Grid, edge: EdgeId, direction: Direction, health: u32) {
        self.health = health;
        self.alive = health > 0;
        self.score = 0;
        self.input.buffer_mut().clear();
        self.place(grid, edge, direction);
    }

    /// Adds points.
    pub fn add_score(&mut self, points: usize) {
        self.score += points;
    }

    /// Removes health, clamped at zero. Zero health kills.
    pub fn take_damage(&mut self, damage: u32) {
        self.health = self.health.saturating_sub(damage);
        if self.health == 0 && self.alive {
            self.alive = false;
            info!(player = %self.id, "player dead");
        }
    }

    fn enter(&mut self, grid: &mut Grid, edge: EdgeId, direction: Option<Direction>) {
        self.edge = Some(edge);
        self.offset = 0;
        if let Some(direction) = direction {
            self.direction = direction;
        }
        grid.set_cut(edge, true);
    }

    // -------------------------------------------------------------------------
    // Motion
    // -------------------------------------------------------------------------

    /// Advances one step, mutating shared cut and capture state.
    ///
    /// Dead or unplaced players do not move.
    pub fn advance(
        &mut self,
        grid: &mut Grid,
        crash_damage: u32,
        surface: &mut dyn RenderSurface,
    ) -> Motion {
        let mut motion = Motion::default();
        let Some(edge) = self.edge.filter(|_| self.alive) else {
            return motion;
        };
        let direction = self.direction;

        self.offset += self.speed.min(grid.min_cell_size());
        let length = grid.edge_length(edge);

        if self.offset > length {
            let overflow = self.offset - length;
            let orientation = grid.edge(edge).orientation();
            let arrival = grid.edge(edge).exit_vertex(direction);
            motion.crossed = Some(arrival);

            if grid.has_cuts_across(arrival, orientation) {
                motion.capture = self.close_loop(grid, edge, direction, arrival, surface);
            }

            let turn = self
                .input
                .turn()
                .filter(|turn| turn.side().orientation() != orientation)
                .and_then(|turn| {
                    grid.vertex(arrival)
                        .edge(turn.side())
                        .map(|next| (turn, next))
                });
            if let Some((turn, next)) = turn {
                trace!(player = %self.id, ?turn, %arrival, "turning");
                self.enter(grid, next, Some(turn.side().direction()));
                motion.turned = Some(turn);
            } else {
                let next = grid.wrapped_next_edge(edge, direction);
                self.enter(grid, next, None);
            }
            self.offset = overflow;
            motion.crash = self.check_for_crash(grid, crash_damage, surface);

            let to = grid.vertex(arrival).position();
            surface.begin_batch(Layer::Cuts);
            surface.draw_line(Layer::Cuts, self.last_position, to, Color::WHITE);
            surface.end_batch(Layer::Cuts);
        }

        self.render_current_position(grid, surface);
        trace!(player = %self.id, offset = self.offset, "advanced");
        motion
    }

    fn close_loop(
        &mut self,
        grid: &mut Grid,
        edge: EdgeId,
        direction: Direction,
        arrival: VertexId,
        surface: &mut dyn RenderSurface,
    ) -> Option<Capture> {
        surface.draw_point(Layer::Cuts, grid.vertex(arrival).position(), self.color);
        let line = grid.trace_loop(edge, direction)?;
        let capture = grid.capture(&line);
        self.add_score(capture.score());

        surface.begin_batch(Layer::Cuts);
        for cut in line.edges() {
            let e = grid.edge(*cut);
            let (from, to) = (grid.vertex(e.from()).position(), grid.vertex(e.to()).position());
            surface.draw_line(Layer::Cuts, from, to, Color::TRANSPARENT);
        }
        surface.end_batch(Layer::Cuts);
        paint_cells(grid, &capture.newly_captured, Color::BLACK, surface);

        debug!(player = %self.id, points = capture.score(), score = self.score, "loop closed");
        Some(capture)
    }

    fn check_for_crash(
        &mut self,
        grid: &Grid,
        crash_damage: u32,
        surface: &mut dyn RenderSurface,
    ) -> Option<Crash> {
        let edge = self.edge?;
        let after = grid.cell_after(edge)?;
        let before = grid.cell_before(edge)?;
        if !(grid.cell(after).is_empty() && grid.cell(before).is_empty()) {
            return None;
        }

        paint_cells(grid, &[after, before], Color::RED, surface);
        self.take_damage(crash_damage);
        info!(player = %self.id, damage = crash_damage, health = self.health, "crashed");
        Some(Crash {
            cells: [after, before],
            damage: crash_damage,
            health: self.health,
        })
    }

    fn render_current_position(&mut self, grid: &Grid, surface: &mut dyn RenderSurface) {
        let Some(edge) = self.edge else {
            return;
        };
        let start = grid.vertex(grid.edge(edge).entry_vertex(self.direction)).position();
        let position = grid.edge_position(edge, self.direction, self.offset);
        surface.begin_batch(Layer::Cuts);
        surface.draw_line(Layer::Cuts, start, position, Color::WHITE);
        surface.end_batch(Layer::Cuts);
        self.last_position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{LocalInputChannel, InputConfig, Symbol};
    use crate::surface::{Canvas, NullSurface};
    use lattice::Orientation;

    fn player(id: &str) -> Player {
        Player::new(id, Box::new(LocalInputChannel::new(InputConfig::default())))
    }

    /// Steps until the player leaves its current edge.
    fn step_to_vertex(player: &mut Player, grid: &mut Grid) -> Motion {
        let start = player.edge();
        for _ in 0..100 {
            let motion = player.advance(grid, DEFAULT_CRASH_DAMAGE, &mut NullSurface);
            if player.edge() != start || motion.crossed.is_some() {
                return motion;
            }
        }
        panic!("player never reached a vertex");
    }

    mod id_tests {
        use super::*;

        #[test]
        fn ids_display_raw_value() {
            let id = PlayerId::new("socket-7");
            assert_eq!(id.to_string(), "socket-7");
            assert_eq!(format!("{id:?}"), "PlayerId(socket-7)");
            assert_eq!(PlayerId::from("a"), PlayerId::new(String::from("a")));
        }
    }

    mod state_tests {
        use super::*;

        #[test]
        fn new_player_is_unplaced_and_healthy() {
            let p = player("a");
            assert_eq!(p.edge(), None);
            assert_eq!(p.health(), DEFAULT_HEALTH);
            assert_eq!(p.speed(), DEFAULT_SPEED);
            assert!(p.is_alive());
        }

        #[test]
        fn unplaced_player_does_not_move() {
            let mut grid = Grid::build(3, 3, 10, 10).unwrap();
            let mut p = player("a");
            let motion = p.advance(&mut grid, 5, &mut NullSurface);
            assert_eq!(motion, Motion::default());
        }

        #[test]
        fn place_cuts_the_start_edge() {
            let mut grid = Grid::build(3, 3, 10, 10).unwrap();
            let edge = grid.vertical_edge(1, 0).unwrap();
            let mut p = player("a");
            p.place(&mut grid, edge, Direction::Forward);
            assert!(grid.is_cut(edge));
            assert_eq!(p.position(&grid), Some(UVec2::new(10, 0)));
        }

        #[test]
        fn damage_clamps_at_zero_and_kills() {
            let mut p = player("a").with_health(7);
            p.take_damage(5);
            assert_eq!(p.health(), 2);
            assert!(p.is_alive());
            p.take_damage(5);
            assert_eq!(p.health(), 0);
            assert!(!p.is_alive());
        }

        #[test]
        fn respawn_restores_state() {
            let mut grid = Grid::build(3, 3, 10, 10).unwrap();
            let edge = grid.vertical_edge(1, 0).unwrap();
            let mut p = player("a");
            p.add_score(4);
            p.take_damage(200);
            p.input_mut().push(Symbol::new("left"));

            p.respawn(&mut grid, edge, Direction::Forward, 100);
            assert_eq!(p.score(), 0);
            assert_eq!(p.health(), 100);
            assert!(p.is_alive());
            assert!(p.input().peek().is_none());
        }
    }

    mod motion_tests {
        use super::*;

        #[test]
        fn speed_is_capped_by_cell_size() {
            let mut grid = Grid::build(3, 3, 4, 10).unwrap();
            let edge = grid.vertical_edge(0, 0).unwrap();
            let mut p = player("a");
            p.place(&mut grid, edge, Direction::Forward);
            p.advance(&mut grid, 5, &mut NullSurface);
            assert_eq!(p.offset(), 4);
        }

        #[test]
        fn straight_travel_keeps_direction_and_cuts_edges() {
            let mut grid = Grid::build(3, 3, 10, 10).unwrap();
            let start = grid.horizontal_edge(0, 1).unwrap();
            let mut p = player("a");
            p.place(&mut grid, start, Direction::Forward);

            let motion = step_to_vertex(&mut p, &mut grid);
            assert_eq!(motion.crossed, grid.vertex_at(1, 1));
            assert_eq!(motion.turned, None);
            assert_eq!(p.edge(), grid.horizontal_edge(1, 1));
            assert_eq!(p.direction(), Direction::Forward);
            assert_eq!(p.offset(), 4);
            assert!(grid.is_cut(grid.horizontal_edge(1, 1).unwrap()));
        }

        #[test]
        fn perpendicular_turn_is_taken_at_vertex() {
            let mut grid = Grid::build(3, 3, 10, 10).unwrap();
            let start = grid.horizontal_edge(0, 1).unwrap();
            let mut p = player("a");
            p.place(&mut grid, start, Direction::Forward);
            p.input_mut().push(Turn::Up.into());

            let motion = step_to_vertex(&mut p, &mut grid);
            assert_eq!(motion.turned, Some(Turn::Up));
            assert_eq!(p.edge(), grid.vertical_edge(1, 0));
            assert_eq!(p.direction(), Direction::Backward);
        }

        #[test]
        fn parallel_turn_is_ignored() {
            let mut grid = Grid::build(3, 3, 10, 10).unwrap();
            let start = grid.horizontal_edge(0, 1).unwrap();
            let mut p = player("a");
            p.place(&mut grid, start, Direction::Forward);
            p.input_mut().push(Turn::Left.into());

            let motion = step_to_vertex(&mut p, &mut grid);
            assert_eq!(motion.turned, None);
            assert_eq!(p.edge(), grid.horizontal_edge(1, 1));
            assert_eq!(p.direction(), Direction::Forward);
        }

        #[test]
        fn turn_off_the_board_continues_straight() {
            let mut grid = Grid::build(3, 3, 10, 10).unwrap();
            // Along the top boundary; there is nothing above it.
            let start = grid.horizontal_edge(0, 0).unwrap();
            let mut p = player("a");
            p.place(&mut grid, start, Direction::Forward);
            p.input_mut().push(Turn::Up.into());

            let motion = step_to_vertex(&mut p, &mut grid);
            assert_eq!(motion.turned, None);
            assert_eq!(p.edge(), grid.horizontal_edge(1, 0));
        }

        #[test]
        fn boundary_wraps_to_opposite_side() {
            let mut grid = Grid::build(3, 3, 10, 10).unwrap();
            let start = grid.vertical_edge(1, 2).unwrap();
            let mut p = player("a");
            p.place(&mut grid, start, Direction::Forward);

            step_to_vertex(&mut p, &mut grid);
            assert_eq!(p.edge(), grid.vertical_edge(1, 0));
            assert_eq!(p.direction(), Direction::Forward);
            assert_eq!(grid.edge(p.edge().unwrap()).orientation(), Orientation::Vertical);
        }

        #[test]
        fn dead_player_stands_still() {
            let mut grid = Grid::build(3, 3, 10, 10).unwrap();
            let start = grid.vertical_edge(1, 0).unwrap();
            let mut p = player("a");
            p.place(&mut grid, start, Direction::Forward);
            p.take_damage(DEFAULT_HEALTH);

            let motion = p.advance(&mut grid, 5, &mut NullSurface);
            assert_eq!(motion, Motion::default());
            assert_eq!(p.offset(), 0);
        }
    }

    mod loop_tests {
        use super::*;

        #[test]
        fn walking_around_a_cell_captures_it() {
            let mut grid = Grid::build(3, 3, 10, 10).unwrap();
            let mut p = player("a");
            let start = grid.vertical_edge(1, 1).unwrap();
            p.place(&mut grid, start, Direction::Forward);

            let mut captured = 0;
            for turn in [Turn::Right, Turn::Up, Turn::Left] {
                p.input_mut().push(turn.into());
                let motion = step_to_vertex(&mut p, &mut grid);
                assert_eq!(motion.turned, Some(turn));
                captured += motion.points();
            }
            assert_eq!(captured, 0);

            // Arriving back at (1, 1) closes the square.
            p.input_mut().push(Turn::Down.into());
            let motion = step_to_vertex(&mut p, &mut grid);
            assert_eq!(motion.points(), 1);
            assert_eq!(p.score(), 1);
            assert!(grid.cell(grid.cell_at(1, 1).unwrap()).is_empty());
        }

        #[test]
        fn capture_is_painted() {
            let mut grid = Grid::build(3, 3, 10, 10).unwrap();
            let mut canvas = Canvas::for_grid(&grid);
            let mut p = player("a");
            let start = grid.vertical_edge(1, 1).unwrap();
            p.place(&mut grid, start, Direction::Forward);

            for turn in [Turn::Right, Turn::Up, Turn::Left, Turn::Down] {
                p.input_mut().push(turn.into());
                let start = p.edge();
                while p.edge() == start {
                    p.advance(&mut grid, 5, &mut canvas);
                }
            }
            assert_eq!(canvas.pixel_at(Layer::Grid, 15, 15), Some(Color::BLACK));
        }
    }

    mod crash_tests {
        use super::*;

        #[test]
        fn entering_between_captured_cells_costs_health() {
            let mut grid = Grid::build(3, 3, 10, 10).unwrap();
            grid.capture_cell(grid.cell_at(0, 1).unwrap());
            grid.capture_cell(grid.cell_at(1, 1).unwrap());

            let mut p = player("a");
            let start = grid.vertical_edge(1, 0).unwrap();
            p.place(&mut grid, start, Direction::Forward);
            let motion = step_to_vertex(&mut p, &mut grid);

            let crash = motion.crash.unwrap();
            assert_eq!(crash.damage, DEFAULT_CRASH_DAMAGE);
            assert_eq!(p.health(), DEFAULT_HEALTH - DEFAULT_CRASH_DAMAGE);
            assert!(!crash.is_fatal());
        }

        #[test]
        fn one_captured_side_is_safe() {
            let mut grid = Grid::build(3, 3, 10, 10).unwrap();
            grid.capture_cell(grid.cell_at(1, 1).unwrap());

            let mut p = player("a");
            let start = grid.vertical_edge(1, 0).unwrap();
            p.place(&mut grid, start, Direction::Forward);
            let motion = step_to_vertex(&mut p, &mut grid);
            assert!(motion.crash.is_none());
            assert_eq!(p.health(), DEFAULT_HEALTH);
        }

        #[test]
        fn boundary_edges_never_crash() {
            let mut grid = Grid::build(3, 3, 10, 10).unwrap();
            grid.capture_cell(grid.cell_at(0, 1).unwrap());

            let mut p = player("a");
            let start = grid.vertical_edge(0, 0).unwrap();
            p.place(&mut grid, start, Direction::Forward);
            let motion = step_to_vertex(&mut p, &mut grid);
            assert!(motion.crash.is_none());
        }

        #[test]
        fn repeated_crashes_kill() {
            let mut grid = Grid::build(3, 3, 10, 10).unwrap();
            grid.capture_cell(grid.cell_at(0, 1).unwrap());
            grid.capture_cell(grid.cell_at(1, 1).unwrap());

            let mut p = player("a").with_health(10);
            let start = grid.vertical_edge(1, 0).unwrap();
            p.place(&mut grid, start, Direction::Forward);
            let first = step_to_vertex(&mut p, &mut grid).crash.unwrap();
            assert_eq!(first.health, 5);

            // Wrap around the column back into the captured pair.
            let mut fatal = None;
            for _ in 0..6 {
                if let Some(crash) = step_to_vertex(&mut p, &mut grid).crash {
                    fatal = Some(crash);
                    break;
                }
            }
            let fatal = fatal.unwrap();
            assert!(fatal.is_fatal());
            assert!(!p.is_alive());
        }
    }
}
