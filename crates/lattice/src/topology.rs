//! Vertex, edge and cell arenas for an `H x V` lattice.
//!
//! All three element kinds live in flat `Vec`s owned by [`Grid`] and refer to
//! each other through copyable ids ([`VertexId`], [`EdgeId`], [`CellId`]).
//! Neighbor "pointers" are `Option` ids, so the vertex/edge/cell graph has no
//! reference cycles and the whole grid can be cloned or shared read-only.
//!
//! # Layout
//!
//! Edges are stored horizontal-first:
//!
//! - horizontal edge `(h, v)` runs from vertex `(h, v)` to `(h + 1, v)` and has
//!   index `v * H + h` for `h < H`, `v <= V`
//! - vertical edge `(h, v)` runs from vertex `(h, v)` to `(h, v + 1)` and has
//!   index `H * (V + 1) + v * (H + 1) + h` for `h <= H`, `v < V`
//!
//! An edge's `(h, v)` tag is the lattice coordinate of its `from` vertex, which
//! for every edge except the right and bottom boundary is also the cell whose
//! top (horizontal) or left (vertical) side it forms.

use std::fmt;

use glam::UVec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GridError, Result};
use crate::Rect;

// =============================================================================
// Ids
// =============================================================================

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an id from a raw arena index.
            #[must_use]
            pub const fn new(index: u32) -> Self {
                Self(index)
            }

            /// Returns the arena index of this id.
            #[must_use]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

arena_id!(
    /// Index of a [`Vertex`] in its grid.
    VertexId,
    "VertexId"
);
arena_id!(
    /// Index of an [`Edge`] in its grid.
    EdgeId,
    "EdgeId"
);
arena_id!(
    /// Index of a [`Cell`] in its grid.
    CellId,
    "CellId"
);

// =============================================================================
// Orientation, Direction, Side
// =============================================================================

/// Axis an edge lies along.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Runs left to right (`from.y == to.y`)
    Horizontal,
    /// Runs top to bottom (`from.x == to.x`)
    Vertical,
}

impl Orientation {
    /// The other axis.
    #[must_use]
    pub const fn perpendicular(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

/// Travel direction along an edge.
///
/// `Forward` (+1) travels from the edge's `from` vertex toward `to`, i.e. right
/// on horizontal edges and down on vertical ones. `Backward` (-1) is the reverse.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward `to` (+1)
    Forward,
    /// Toward `from` (-1)
    Backward,
}

/// One of the four lattice neighbor slots.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Toward smaller `v`
    Above,
    /// Toward larger `v`
    Below,
    /// Toward smaller `h`
    Prev,
    /// Toward larger `h`
    Next,
}

impl Side {
    /// All sides in neighbor-exploration priority order.
    pub const ALL: [Side; 4] = [Side::Above, Side::Below, Side::Prev, Side::Next];

    /// The side reached by travelling in `direction` along an `orientation` line.
    #[must_use]
    pub const fn along(orientation: Orientation, direction: Direction) -> Self {
        match (orientation, direction) {
            (Orientation::Vertical, Direction::Backward) => Self::Above,
            (Orientation::Vertical, Direction::Forward) => Self::Below,
            (Orientation::Horizontal, Direction::Backward) => Self::Prev,
            (Orientation::Horizontal, Direction::Forward) => Self::Next,
        }
    }

    /// Axis a move toward this side travels along.
    #[must_use]
    pub const fn orientation(self) -> Orientation {
        match self {
            Self::Above | Self::Below => Orientation::Vertical,
            Self::Prev | Self::Next => Orientation::Horizontal,
        }
    }

    /// Travel direction of a move toward this side.
    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Self::Above | Self::Prev => Direction::Backward,
            Self::Below | Self::Next => Direction::Forward,
        }
    }
}

/// Four optional edge references, one per [`Side`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjacent {
    /// Edge toward smaller `v`
    pub above: Option<EdgeId>,
    /// Edge toward larger `v`
    pub below: Option<EdgeId>,
    /// Edge toward smaller `h`
    pub prev: Option<EdgeId>,
    /// Edge toward larger `h`
    pub next: Option<EdgeId>,
}

impl Adjacent {
    /// Returns the edge in the given slot.
    #[must_use]
    pub const fn get(&self, side: Side) -> Option<EdgeId> {
        match side {
            Side::Above => self.above,
            Side::Below => self.below,
            Side::Prev => self.prev,
            Side::Next => self.next,
        }
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn count(&self) -> usize {
        Side::ALL.iter().filter(|side| self.get(**side).is_some()).count()
    }

    /// Iterates occupied slots in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (Side, EdgeId)> + '_ {
        Side::ALL
            .into_iter()
            .filter_map(|side| self.get(side).map(|edge| (side, edge)))
    }
}

// =============================================================================
// Elements
// =============================================================================

/// A lattice point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vertex {
    pub(crate) h: u32,
    pub(crate) v: u32,
    pub(crate) position: UVec2,
    pub(crate) edges: Adjacent,
}

impl Vertex {
    /// Lattice coordinates `(h, v)`.
    #[must_use]
    pub const fn lattice(&self) -> (u32, u32) {
        (self.h, self.v)
    }

    /// Pixel position.
    #[must_use]
    pub const fn position(&self) -> UVec2 {
        self.position
    }

    /// Incident edges (vertical edges in `above`/`below`, horizontal in `prev`/`next`).
    #[must_use]
    pub const fn edges(&self) -> &Adjacent {
        &self.edges
    }

    /// The incident edge on one side, if the lattice extends that way.
    #[must_use]
    pub const fn edge(&self, side: Side) -> Option<EdgeId> {
        self.edges.get(side)
    }
}

/// A unit segment between two adjacent vertices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub(crate) h: u32,
    pub(crate) v: u32,
    pub(crate) from: VertexId,
    pub(crate) to: VertexId,
    pub(crate) orientation: Orientation,
    pub(crate) is_cut: bool,
    pub(crate) links: Adjacent,
}

impl Edge {
    /// Lattice coordinates of the `from` vertex.
    #[must_use]
    pub const fn lattice(&self) -> (u32, u32) {
        (self.h, self.v)
    }

    /// Left (horizontal) or top (vertical) endpoint.
    #[must_use]
    pub const fn from(&self) -> VertexId {
        self.from
    }

    /// Right (horizontal) or bottom (vertical) endpoint.
    #[must_use]
    pub const fn to(&self) -> VertexId {
        self.to
    }

    /// Axis of the edge.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// True for vertical edges.
    #[must_use]
    pub const fn is_vertical(&self) -> bool {
        matches!(self.orientation, Orientation::Vertical)
    }

    /// True for horizontal edges.
    #[must_use]
    pub const fn is_horizontal(&self) -> bool {
        matches!(self.orientation, Orientation::Horizontal)
    }

    /// Whether a trail has crossed this edge.
    #[must_use]
    pub const fn is_cut(&self) -> bool {
        self.is_cut
    }

    /// Same-orientation neighbors, one lattice step away on each side.
    ///
    /// Along the edge's own line the neighbor continues it (`prev`/`next` for
    /// horizontal edges, `above`/`below` for vertical ones). Across the line the
    /// neighbor is the parallel edge in the adjacent row or column.
    #[must_use]
    pub const fn links(&self) -> &Adjacent {
        &self.links
    }

    /// Vertex a traveller in `direction` starts from.
    #[must_use]
    pub const fn entry_vertex(&self, direction: Direction) -> VertexId {
        match direction {
            Direction::Forward => self.from,
            Direction::Backward => self.to,
        }
    }

    /// Vertex a traveller in `direction` arrives at.
    #[must_use]
    pub const fn exit_vertex(&self, direction: Direction) -> VertexId {
        match direction {
            Direction::Forward => self.to,
            Direction::Backward => self.from,
        }
    }

    /// Endpoint opposite `vertex`.
    #[must_use]
    pub fn other_end(&self, vertex: VertexId) -> VertexId {
        if vertex == self.from {
            self.to
        } else {
            self.from
        }
    }

    /// Physical continuation of the edge's line in `direction`, if any.
    #[must_use]
    pub const fn next_edge(&self, direction: Direction) -> Option<EdgeId> {
        self.links.get(Side::along(self.orientation, direction))
    }
}

/// A unit square of the lattice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub(crate) h: u32,
    pub(crate) v: u32,
    pub(crate) top: EdgeId,
    pub(crate) left: EdgeId,
    pub(crate) right: EdgeId,
    pub(crate) bottom: EdgeId,
    pub(crate) is_empty: bool,
}

impl Cell {
    /// Lattice coordinates of the cell (its top-left vertex).
    #[must_use]
    pub const fn lattice(&self) -> (u32, u32) {
        (self.h, self.v)
    }

    /// Top bounding edge.
    #[must_use]
    pub const fn top(&self) -> EdgeId {
        self.top
    }

    /// Left bounding edge.
    #[must_use]
    pub const fn left(&self) -> EdgeId {
        self.left
    }

    /// Right bounding edge.
    #[must_use]
    pub const fn right(&self) -> EdgeId {
        self.right
    }

    /// Bottom bounding edge.
    #[must_use]
    pub const fn bottom(&self) -> EdgeId {
        self.bottom
    }

    /// All four bounding edges: top, left, right, bottom.
    #[must_use]
    pub const fn edges(&self) -> [EdgeId; 4] {
        [self.top, self.left, self.right, self.bottom]
    }

    /// Whether the cell has been captured.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.is_empty
    }
}

// =============================================================================
// Grid
// =============================================================================

/// The full lattice: vertices, edges and cells of an `H x V` board.
///
/// # Example
///
/// ```
/// use lattice::{Grid, Side};
///
/// let grid = Grid::build(4, 3, 20, 10).unwrap();
/// assert_eq!(grid.vertex_count(), 5 * 4);
/// assert_eq!(grid.cell_count(), 12);
///
/// // Corner vertices only have two incident edges.
/// let corner = grid.vertex(grid.vertex_at(0, 0).unwrap());
/// assert_eq!(corner.edges().count(), 2);
/// assert!(corner.edge(Side::Above).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    h_divisions: u32,
    v_divisions: u32,
    cell_width: u32,
    cell_height: u32,
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) cells: Vec<Cell>,
}

impl Grid {
    /// Builds the lattice for `h_divisions x v_divisions` cells of
    /// `cell_width x cell_height` pixels.
    ///
    /// Vertices are placed at `(h * cell_width, v * cell_height)`. Every edge is
    /// created once and shared by the cells on either side; a second pass links
    /// edge neighbors and vertex incidence.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimensions`] or [`GridError::InvalidCellSize`]
    /// for zero values, and [`GridError::TooLarge`] when the lattice would not
    /// fit 32-bit indices or pixel coordinates.
    pub fn build(
        h_divisions: u32,
        v_divisions: u32,
        cell_width: u32,
        cell_height: u32,
    ) -> Result<Self> {
        Self::validate(h_divisions, v_divisions, cell_width, cell_height)?;

        let mut grid = Self {
            h_divisions,
            v_divisions,
            cell_width,
            cell_height,
            vertices: Vec::with_capacity(((h_divisions + 1) * (v_divisions + 1)) as usize),
            edges: Vec::new(),
            cells: Vec::with_capacity((h_divisions * v_divisions) as usize),
        };

        for v in 0..=v_divisions {
            for h in 0..=h_divisions {
                grid.vertices.push(Vertex {
                    h,
                    v,
                    position: UVec2::new(h * cell_width, v * cell_height),
                    edges: Adjacent::default(),
                });
            }
        }

        for v in 0..=v_divisions {
            for h in 0..h_divisions {
                grid.push_edge(h, v, Orientation::Horizontal);
            }
        }
        for v in 0..v_divisions {
            for h in 0..=h_divisions {
                grid.push_edge(h, v, Orientation::Vertical);
            }
        }

        for v in 0..v_divisions {
            for h in 0..h_divisions {
                grid.cells.push(Cell {
                    h,
                    v,
                    top: grid.h_edge_id(h, v),
                    left: grid.v_edge_id(h, v),
                    right: grid.v_edge_id(h + 1, v),
                    bottom: grid.h_edge_id(h, v + 1),
                    is_empty: false,
                });
            }
        }

        grid.link();

        debug!(
            h_divisions,
            v_divisions,
            cell_width,
            cell_height,
            vertices = grid.vertices.len(),
            edges = grid.edges.len(),
            "grid built"
        );
        Ok(grid)
    }

    fn validate(h_divisions: u32, v_divisions: u32, cell_width: u32, cell_height: u32) -> Result<()> {
        if h_divisions == 0 || v_divisions == 0 {
            return Err(GridError::InvalidDimensions {
                h_divisions,
                v_divisions,
            });
        }
        if cell_width == 0 || cell_height == 0 {
            return Err(GridError::InvalidCellSize {
                cell_width,
                cell_height,
            });
        }
        let (h, v) = (u64::from(h_divisions), u64::from(v_divisions));
        let edges = h * (v + 1) + v * (h + 1);
        let fits = (h + 1) * (v + 1) <= u64::from(u32::MAX)
            && edges <= u64::from(u32::MAX)
            && h * u64::from(cell_width) <= u64::from(u32::MAX)
            && v * u64::from(cell_height) <= u64::from(u32::MAX);
        if fits {
            Ok(())
        } else {
            Err(GridError::TooLarge {
                h_divisions,
                v_divisions,
            })
        }
    }

    fn push_edge(&mut self, h: u32, v: u32, orientation: Orientation) {
        let (to_h, to_v) = match orientation {
            Orientation::Horizontal => (h + 1, v),
            Orientation::Vertical => (h, v + 1),
        };
        self.edges.push(Edge {
            h,
            v,
            from: self.vertex_id(h, v),
            to: self.vertex_id(to_h, to_v),
            orientation,
            is_cut: false,
            links: Adjacent::default(),
        });
    }

    /// Second construction pass: edge neighbor links and vertex incidence.
    fn link(&mut self) {
        for index in 0..self.edges.len() {
            let (h, v) = (self.edges[index].h, self.edges[index].v);
            let links = match self.edges[index].orientation {
                Orientation::Horizontal => Adjacent {
                    above: v.checked_sub(1).and_then(|up| self.horizontal_edge(h, up)),
                    below: self.horizontal_edge(h, v + 1),
                    prev: h.checked_sub(1).and_then(|left| self.horizontal_edge(left, v)),
                    next: self.horizontal_edge(h + 1, v),
                },
                Orientation::Vertical => Adjacent {
                    above: v.checked_sub(1).and_then(|up| self.vertical_edge(h, up)),
                    below: self.vertical_edge(h, v + 1),
                    prev: h.checked_sub(1).and_then(|left| self.vertical_edge(left, v)),
                    next: self.vertical_edge(h + 1, v),
                },
            };
            self.edges[index].links = links;
        }

        for index in 0..self.vertices.len() {
            let (h, v) = (self.vertices[index].h, self.vertices[index].v);
            self.vertices[index].edges = Adjacent {
                above: v.checked_sub(1).and_then(|up| self.vertical_edge(h, up)),
                below: self.vertical_edge(h, v),
                prev: h.checked_sub(1).and_then(|left| self.horizontal_edge(left, v)),
                next: self.horizontal_edge(h, v),
            };
        }
    }

    // -------------------------------------------------------------------------
    // Dimensions
    // -------------------------------------------------------------------------

    /// Number of cell columns.
    #[must_use]
    pub const fn h_divisions(&self) -> u32 {
        self.h_divisions
    }

    /// Number of cell rows.
    #[must_use]
    pub const fn v_divisions(&self) -> u32 {
        self.v_divisions
    }

    /// Cell width in pixels.
    #[must_use]
    pub const fn cell_width(&self) -> u32 {
        self.cell_width
    }

    /// Cell height in pixels.
    #[must_use]
    pub const fn cell_height(&self) -> u32 {
        self.cell_height
    }

    /// Smaller of the two cell dimensions.
    #[must_use]
    pub fn min_cell_size(&self) -> u32 {
        self.cell_width.min(self.cell_height)
    }

    /// Board size in pixels.
    #[must_use]
    pub const fn pixel_size(&self) -> UVec2 {
        UVec2::new(
            self.h_divisions * self.cell_width,
            self.v_divisions * self.cell_height,
        )
    }

    /// Number of vertices, `(H + 1) * (V + 1)`.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges, `H * (V + 1) + V * (H + 1)`.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of cells, `H * V`.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    // -------------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------------

    fn vertex_id(&self, h: u32, v: u32) -> VertexId {
        VertexId::new(v * (self.h_divisions + 1) + h)
    }

    fn h_edge_id(&self, h: u32, v: u32) -> EdgeId {
        EdgeId::new(v * self.h_divisions + h)
    }

    fn v_edge_id(&self, h: u32, v: u32) -> EdgeId {
        EdgeId::new(self.h_divisions * (self.v_divisions + 1) + v * (self.h_divisions + 1) + h)
    }

    /// Vertex at lattice coordinates, if inside the lattice.
    #[must_use]
    pub fn vertex_at(&self, h: u32, v: u32) -> Option<VertexId> {
        (h <= self.h_divisions && v <= self.v_divisions).then(|| self.vertex_id(h, v))
    }

    /// Horizontal edge starting at vertex `(h, v)`, if inside the lattice.
    #[must_use]
    pub fn horizontal_edge(&self, h: u32, v: u32) -> Option<EdgeId> {
        (h < self.h_divisions && v <= self.v_divisions).then(|| self.h_edge_id(h, v))
    }

    /// Vertical edge starting at vertex `(h, v)`, if inside the lattice.
    #[must_use]
    pub fn vertical_edge(&self, h: u32, v: u32) -> Option<EdgeId> {
        (h <= self.h_divisions && v < self.v_divisions).then(|| self.v_edge_id(h, v))
    }

    /// Edge of the given orientation starting at vertex `(h, v)`.
    #[must_use]
    pub fn edge_at(&self, h: u32, v: u32, orientation: Orientation) -> Option<EdgeId> {
        match orientation {
            Orientation::Horizontal => self.horizontal_edge(h, v),
            Orientation::Vertical => self.vertical_edge(h, v),
        }
    }

    /// Edge keyed by its ordered `(from, to)` vertex pair.
    ///
    /// Returns `None` when the vertices are not lattice neighbors or are given
    /// in `to, from` order.
    #[must_use]
    pub fn edge_between(&self, from: VertexId, to: VertexId) -> Option<EdgeId> {
        let (fh, fv) = self.vertices.get(from.index())?.lattice();
        let (th, tv) = self.vertices.get(to.index())?.lattice();
        if fv == tv && th == fh + 1 {
            self.horizontal_edge(fh, fv)
        } else if fh == th && tv == fv + 1 {
            self.vertical_edge(fh, fv)
        } else {
            None
        }
    }

    /// Cell at lattice coordinates, or `None` beyond the lattice.
    #[must_use]
    pub fn cell_at(&self, h: u32, v: u32) -> Option<CellId> {
        (h < self.h_divisions && v < self.v_divisions)
            .then(|| CellId::new(v * self.h_divisions + h))
    }

    /// Returns a vertex by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this grid.
    #[must_use]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()]
    }

    /// Returns an edge by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this grid.
    #[must_use]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    /// Returns a cell by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this grid.
    #[must_use]
    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.index()]
    }

    // Arena lengths are bounded by `validate`, so indices always fit `u32`.

    /// Iterates all edge ids in storage order.
    #[allow(clippy::cast_possible_truncation)]
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edges.len()).map(|index| EdgeId::new(index as u32))
    }

    /// Iterates all cell ids row by row.
    #[allow(clippy::cast_possible_truncation)]
    pub fn cell_ids(&self) -> impl Iterator<Item = CellId> + '_ {
        (0..self.cells.len()).map(|index| CellId::new(index as u32))
    }

    /// Iterates all vertex ids row by row.
    #[allow(clippy::cast_possible_truncation)]
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).map(|index| VertexId::new(index as u32))
    }

    // -------------------------------------------------------------------------
    // Movement geometry
    // -------------------------------------------------------------------------

    /// Length of an edge in pixels.
    #[must_use]
    pub fn edge_length(&self, edge: EdgeId) -> u32 {
        match self.edge(edge).orientation {
            Orientation::Horizontal => self.cell_width,
            Orientation::Vertical => self.cell_height,
        }
    }

    /// Pixel position `offset` pixels into `edge` when travelling in `direction`.
    #[must_use]
    pub fn edge_position(&self, edge: EdgeId, direction: Direction, offset: u32) -> UVec2 {
        let offset = offset.min(self.edge_length(edge));
        let e = self.edge(edge);
        let from = self.vertex(e.from).position;
        let to = self.vertex(e.to).position;
        match (e.orientation, direction) {
            (Orientation::Vertical, Direction::Forward) => UVec2::new(to.x, from.y + offset),
            (Orientation::Vertical, Direction::Backward) => UVec2::new(to.x, to.y - offset),
            (Orientation::Horizontal, Direction::Forward) => UVec2::new(from.x + offset, from.y),
            (Orientation::Horizontal, Direction::Backward) => UVec2::new(to.x - offset, from.y),
        }
    }

    /// Continuation of `edge` in `direction`, wrapping to the opposite boundary.
    ///
    /// When the line has a physical neighbor it is returned. Otherwise the
    /// traveller wraps to the first edge of the same line at the far side of
    /// the lattice, which makes movement toroidal without extra geometry.
    #[must_use]
    pub fn wrapped_next_edge(&self, edge: EdgeId, direction: Direction) -> EdgeId {
        let e = self.edge(edge);
        if let Some(next) = e.next_edge(direction) {
            return next;
        }
        match (e.orientation, direction) {
            (Orientation::Vertical, Direction::Backward) => self.v_edge_id(e.h, self.v_divisions - 1),
            (Orientation::Vertical, Direction::Forward) => self.v_edge_id(e.h, 0),
            (Orientation::Horizontal, Direction::Backward) => {
                self.h_edge_id(self.h_divisions - 1, e.v)
            }
            (Orientation::Horizontal, Direction::Forward) => self.h_edge_id(0, e.v),
        }
    }

    // -------------------------------------------------------------------------
    // Cells
    // -------------------------------------------------------------------------

    /// Cell on the far side of an edge: below a horizontal edge, right of a
    /// vertical one.
    #[must_use]
    pub fn cell_after(&self, edge: EdgeId) -> Option<CellId> {
        let e = self.edge(edge);
        self.cell_at(e.h, e.v)
    }

    /// Cell on the near side of an edge: above a horizontal edge, left of a
    /// vertical one.
    #[must_use]
    pub fn cell_before(&self, edge: EdgeId) -> Option<CellId> {
        let e = self.edge(edge);
        match e.orientation {
            Orientation::Horizontal => e.v.checked_sub(1).and_then(|up| self.cell_at(e.h, up)),
            Orientation::Vertical => e.h.checked_sub(1).and_then(|left| self.cell_at(left, e.v)),
        }
    }

    /// The one or two cells an edge bounds.
    #[must_use]
    pub fn cells_beside(&self, edge: EdgeId) -> Vec<CellId> {
        self.cell_before(edge)
            .into_iter()
            .chain(self.cell_after(edge))
            .collect()
    }

    /// Pixel bounds of a cell, derived from its corner vertices.
    #[must_use]
    pub fn cell_bounds(&self, cell: CellId) -> Rect {
        let c = self.cell(cell);
        let top = self.edge(c.top);
        let bottom = self.edge(c.bottom);
        Rect::from_corners(
            self.vertex(top.from).position,
            self.vertex(bottom.to).position,
        )
    }

    /// Marks a cell captured. Returns `true` only the first time.
    pub fn capture_cell(&mut self, cell: CellId) -> bool {
        let c = &mut self.cells[cell.index()];
        if c.is_empty {
            false
        } else {
            c.is_empty = true;
            true
        }
    }

    /// Number of captured cells.
    #[must_use]
    pub fn empty_cell_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_empty).count()
    }

    /// True once every cell has been captured.
    #[must_use]
    pub fn is_fully_captured(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_empty)
    }

    /// Clears every cut and capture, returning the grid to its built state.
    pub fn reset(&mut self) {
        for edge in &mut self.edges {
            edge.is_cut = false;
        }
        for cell in &mut self.cells {
            cell.is_empty = false;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
