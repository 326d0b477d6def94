//! # Lattice
//!
//! Rectangular grid topology for edge-following territory games.
//!
//! The lattice represents an `H x V` board as three index arenas:
//!
//! - **Vertices**: lattice points with pixel positions and up to four incident edges
//! - **Edges**: axis-aligned unit segments carrying a mutable *cut* flag
//! - **Cells**: unit squares bounded by four shared edges, with a mutable *empty* flag
//!
//! On top of the topology it provides the two algorithms that turn trails into
//! territory:
//!
//! - **Loop tracing** ([`Grid::trace_loop`]): a stack-based depth-first walk over
//!   cut edges that recovers the closed [`CutLine`] behind a junction.
//! - **Region capture** ([`Grid::capture`]): a row-parity scan over the cut line's
//!   bounding box that decides which cells the loop encloses.
//!
//! ## Quick Start
//!
//! ```
//! use lattice::{Direction, Grid};
//!
//! let mut grid = Grid::build(3, 3, 10, 10).unwrap();
//!
//! // Walk around cell (1, 1) clockwise, cutting as we go.
//! let top = grid.horizontal_edge(1, 1).unwrap();
//! let right = grid.vertical_edge(2, 1).unwrap();
//! let bottom = grid.horizontal_edge(1, 2).unwrap();
//! let left = grid.vertical_edge(1, 1).unwrap();
//! for edge in [top, right, bottom, left] {
//!     grid.set_cut(edge, true);
//! }
//!
//! // Travelling up the left edge closes the loop at (1, 1).
//! let line = grid.trace_loop(left, Direction::Backward).unwrap();
//! let capture = grid.capture(&line);
//! assert_eq!(capture.score(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod capture;
pub mod cut;
pub mod error;
pub mod topology;
pub mod trace;

// Re-exports for convenience
pub use capture::Capture;
pub use cut::Sides;
pub use error::{GridError, Result};
pub use topology::{
    Adjacent, Cell, CellId, Direction, Edge, EdgeId, Grid, Orientation, Side, Vertex, VertexId,
};
pub use trace::CutLine;

/// Axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    /// Left edge in pixels
    pub x: u32,
    /// Top edge in pixels
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create the smallest rectangle spanning two corner points.
    #[must_use]
    pub fn from_corners(a: glam::UVec2, b: glam::UVec2) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    /// Top-left corner.
    #[must_use]
    pub const fn min(&self) -> glam::UVec2 {
        glam::UVec2::new(self.x, self.y)
    }

    /// Bottom-right corner.
    #[must_use]
    pub const fn max(&self) -> glam::UVec2 {
        glam::UVec2::new(self.x + self.width, self.y + self.height)
    }

    /// Smallest rectangle covering both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self::from_corners(self.min().min(other.min()), self.max().max(other.max()))
    }

    /// Check if a point lies inside the rectangle (edges inclusive).
    #[must_use]
    pub fn contains(&self, point: glam::UVec2) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x <= self.x + self.width
            && point.y <= self.y + self.height
    }
}
