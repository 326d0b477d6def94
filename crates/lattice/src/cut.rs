//! Cut state: the per-edge trail flag and vertex predicates over it.
//!
//! A cut edge is one a trail has travelled across. Cuts persist until a
//! capture consumes the loop they form or the grid is reset, regardless of who
//! made them.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::topology::{EdgeId, Grid, Orientation, Side, VertexId};

bitflags! {
    /// Which incident edges of a vertex are cut.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Sides: u8 {
        /// Vertical edge above the vertex
        const ABOVE = 1 << 0;
        /// Vertical edge below the vertex
        const BELOW = 1 << 1;
        /// Horizontal edge left of the vertex
        const PREV = 1 << 2;
        /// Horizontal edge right of the vertex
        const NEXT = 1 << 3;

        /// Either vertical side
        const VERTICAL = Self::ABOVE.bits() | Self::BELOW.bits();
        /// Either horizontal side
        const HORIZONTAL = Self::PREV.bits() | Self::NEXT.bits();
    }
}

impl Sides {
    /// Flag for a single side.
    #[must_use]
    pub const fn of(side: Side) -> Self {
        match side {
            Side::Above => Self::ABOVE,
            Side::Below => Self::BELOW,
            Side::Prev => Self::PREV,
            Side::Next => Self::NEXT,
        }
    }

    /// Both sides of one axis.
    #[must_use]
    pub const fn axis(orientation: Orientation) -> Self {
        match orientation {
            Orientation::Vertical => Self::VERTICAL,
            Orientation::Horizontal => Self::HORIZONTAL,
        }
    }
}

impl Grid {
    /// Whether `edge` is cut.
    #[must_use]
    pub fn is_cut(&self, edge: EdgeId) -> bool {
        self.edge(edge).is_cut
    }

    /// Sets or clears the cut flag on `edge`.
    pub fn set_cut(&mut self, edge: EdgeId, cut: bool) {
        self.edges[edge.index()].is_cut = cut;
    }

    /// Cut incident edges of `vertex`.
    #[must_use]
    pub fn cut_sides(&self, vertex: VertexId) -> Sides {
        self.vertex(vertex)
            .edges()
            .iter()
            .filter(|(_, edge)| self.is_cut(*edge))
            .fold(Sides::empty(), |sides, (side, _)| sides | Sides::of(side))
    }

    /// True if the edge above or below `vertex` is cut.
    #[must_use]
    pub fn has_vertical_cuts(&self, vertex: VertexId) -> bool {
        self.cut_sides(vertex).intersects(Sides::VERTICAL)
    }

    /// True if the edges above and below `vertex` are both cut.
    #[must_use]
    pub fn has_both_vertical_cuts(&self, vertex: VertexId) -> bool {
        self.cut_sides(vertex).contains(Sides::VERTICAL)
    }

    /// True if the edge left or right of `vertex` is cut.
    #[must_use]
    pub fn has_horizontal_cuts(&self, vertex: VertexId) -> bool {
        self.cut_sides(vertex).intersects(Sides::HORIZONTAL)
    }

    /// True if the edges left and right of `vertex` are both cut.
    #[must_use]
    pub fn has_both_horizontal_cuts(&self, vertex: VertexId) -> bool {
        self.cut_sides(vertex).contains(Sides::HORIZONTAL)
    }

    /// True if a traveller moving along `travel` meets a cut crossing its path
    /// at `vertex`, i.e. a cut on the perpendicular axis.
    #[must_use]
    pub fn has_cuts_across(&self, vertex: VertexId, travel: Orientation) -> bool {
        self.cut_sides(vertex)
            .intersects(Sides::axis(travel.perpendicular()))
    }

    /// Iterates cut edges in storage order.
    pub fn cut_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edge_ids().filter(|edge| self.is_cut(*edge))
    }

    /// Number of cut edges.
    #[must_use]
    pub fn cut_count(&self) -> usize {
        self.edges.iter().filter(|edge| edge.is_cut).count()
    }

    /// Clears every cut, leaving captures untouched.
    pub fn clear_cuts(&mut self) {
        for edge in &mut self.edges {
            edge.is_cut = false;
        }
    }
}
