//! Topology errors

use thiserror::Error;

use crate::topology::Orientation;

/// Lattice result type
pub type Result<T> = std::result::Result<T, GridError>;

/// Errors raised while constructing or addressing a grid.
///
/// Lookups themselves return `None` for out-of-range cells, missing neighbors
/// and untraceable loops. Callers that require an edge to exist turn the
/// absence into [`GridError::MissingEdge`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// A grid needs at least one division on each axis.
    #[error("invalid grid dimensions {h_divisions}x{v_divisions}: both must be at least 1")]
    InvalidDimensions {
        /// Requested horizontal divisions
        h_divisions: u32,
        /// Requested vertical divisions
        v_divisions: u32,
    },

    /// Cells must be at least one pixel on each side.
    #[error("invalid cell size {cell_width}x{cell_height}: both must be at least 1 pixel")]
    InvalidCellSize {
        /// Requested cell width in pixels
        cell_width: u32,
        /// Requested cell height in pixels
        cell_height: u32,
    },

    /// The lattice would not fit the 32-bit index space or pixel range.
    #[error("grid {h_divisions}x{v_divisions} is too large to index")]
    TooLarge {
        /// Requested horizontal divisions
        h_divisions: u32,
        /// Requested vertical divisions
        v_divisions: u32,
    },

    /// No edge of that orientation starts at the given vertex.
    #[error("no {orientation:?} edge starts at ({h}, {v})")]
    MissingEdge {
        /// Horizontal lattice coordinate
        h: u32,
        /// Vertical lattice coordinate
        v: u32,
        /// Requested axis
        orientation: Orientation,
    },
}
