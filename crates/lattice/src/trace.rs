//! Loop tracing over the cut subgraph.
//!
//! When a traveller arrives at a vertex that already has cuts crossing its
//! path, the edge it just finished may close a loop. [`Grid::trace_loop`] walks
//! backwards from that edge through cut edges only, looking for a connected
//! path that returns to the arrival vertex. The path, start edge first, is the
//! loop's [`CutLine`].
//!
//! # Traversal
//!
//! The walk is a depth-first search on an explicit stack, so its depth does
//! not depend on the size of the cut network. Each edge is visited at most
//! once. At every vertex the incident cut edges are explored in the fixed
//! priority order above, below, prev, next, which makes the discovered loop
//! deterministic for a given cut state.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::topology::{Direction, EdgeId, Grid, Side, VertexId};
use crate::Rect;

/// An ordered chain of cut edges forming one discovered loop.
///
/// Built by [`Grid::trace_loop`], consumed once by [`Grid::capture`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CutLine {
    edges: Vec<EdgeId>,
    members: BTreeSet<EdgeId>,
}

impl CutLine {
    /// Creates an empty cut line.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cut line from edges in order, skipping repeats.
    #[must_use]
    pub fn from_edges(edges: impl IntoIterator<Item = EdgeId>) -> Self {
        let mut line = Self::new();
        for edge in edges {
            line.push(edge);
        }
        line
    }

    /// Appends an edge. Returns `false` if it was already part of the line.
    pub fn push(&mut self, edge: EdgeId) -> bool {
        if self.members.insert(edge) {
            self.edges.push(edge);
            true
        } else {
            false
        }
    }

    /// Edges in traversal order.
    #[must_use]
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Whether `edge` belongs to the line.
    #[must_use]
    pub fn contains(&self, edge: EdgeId) -> bool {
        self.members.contains(&edge)
    }

    /// Number of edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// True if the line has no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Every endpoint of every edge in the line.
    #[must_use]
    pub fn vertices(&self, grid: &Grid) -> BTreeSet<VertexId> {
        self.edges
            .iter()
            .flat_map(|edge| {
                let e = grid.edge(*edge);
                [e.from(), e.to()]
            })
            .collect()
    }

    /// Lattice bounding box as `(h_min, v_min, h_max, v_max)` vertex coordinates.
    #[must_use]
    pub fn lattice_bounds(&self, grid: &Grid) -> Option<(u32, u32, u32, u32)> {
        self.vertices(grid)
            .into_iter()
            .map(|vertex| grid.vertex(vertex).lattice())
            .fold(None, |bounds, (h, v)| match bounds {
                None => Some((h, v, h, v)),
                Some((h0, v0, h1, v1)) => Some((h0.min(h), v0.min(v), h1.max(h), v1.max(v))),
            })
    }

    /// Pixel bounding box of the line.
    #[must_use]
    pub fn bounds(&self, grid: &Grid) -> Option<Rect> {
        let (h0, v0, h1, v1) = self.lattice_bounds(grid)?;
        let min = grid.vertex(grid.vertex_at(h0, v0)?).position();
        let max = grid.vertex(grid.vertex_at(h1, v1)?).position();
        Some(Rect::from_corners(min, max))
    }

    /// Clears the cut flag on every edge of the line.
    pub fn uncut(&self, grid: &mut Grid) {
        for edge in &self.edges {
            grid.set_cut(*edge, false);
        }
    }
}

impl Grid {
    /// Recovers the loop closed by travelling `start` in `direction`.
    ///
    /// The destination is the vertex the traveller arrives at. The search
    /// begins at the other end of `start` and follows cut edges until it
    /// reaches an edge whose far end is the destination. The returned line
    /// starts with `start` and lists the connecting path in order.
    ///
    /// Returns `None` when no cut path leads back to the destination. That is
    /// a normal outcome (the trail touched a dead-end cut) and means nothing is
    /// captured.
    #[must_use]
    pub fn trace_loop(&self, start: EdgeId, direction: Direction) -> Option<CutLine> {
        let edge = self.edge(start);
        let destination = edge.exit_vertex(direction);
        let origin = edge.entry_vertex(direction);
        debug!(%start, ?direction, %destination, "tracing loop");

        // Visited edges mapped to the edge they were reached from.
        let mut reached_from: HashMap<EdgeId, Option<EdgeId>> = HashMap::new();
        let mut stack: Vec<(EdgeId, VertexId, Option<EdgeId>)> = vec![(start, origin, None)];

        while let Some((edge, far, parent)) = stack.pop() {
            if reached_from.contains_key(&edge) {
                continue;
            }
            reached_from.insert(edge, parent);

            if far == destination {
                let line = Self::unwind(&reached_from, edge);
                debug!(%start, edges = line.len(), "loop traced");
                return Some(line);
            }

            // Pushed in reverse so the highest-priority side is popped first.
            let vertex = self.vertex(far);
            for side in Side::ALL.iter().rev() {
                if let Some(next) = vertex.edge(*side) {
                    if self.is_cut(next) && !reached_from.contains_key(&next) {
                        stack.push((next, self.edge(next).other_end(far), Some(edge)));
                    }
                }
            }
        }

        debug!(%start, %destination, visited = reached_from.len(), "no cut path closes the loop");
        None
    }

    fn unwind(reached_from: &HashMap<EdgeId, Option<EdgeId>>, last: EdgeId) -> CutLine {
        let mut path = vec![last];
        let mut cursor = reached_from.get(&last).copied().flatten();
        while let Some(edge) = cursor {
            path.push(edge);
            cursor = reached_from.get(&edge).copied().flatten();
        }
        path.reverse();
        CutLine::from_edges(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Cuts the four edges around cell `(h, v)` and returns them as
    /// (top, right, bottom, left).
    fn cut_square(grid: &mut Grid, h: u32, v: u32) -> [EdgeId; 4] {
        let edges = [
            grid.horizontal_edge(h, v).unwrap(),
            grid.vertical_edge(h + 1, v).unwrap(),
            grid.horizontal_edge(h, v + 1).unwrap(),
            grid.vertical_edge(h, v).unwrap(),
        ];
        for edge in edges {
            grid.set_cut(edge, true);
        }
        edges
    }

    mod cut_line_tests {
        use super::*;

        #[test]
        fn push_skips_repeats() {
            let mut line = CutLine::new();
            assert!(line.push(EdgeId::new(3)));
            assert!(line.push(EdgeId::new(1)));
            assert!(!line.push(EdgeId::new(3)));
            assert_eq!(line.edges(), &[EdgeId::new(3), EdgeId::new(1)]);
            assert!(line.contains(EdgeId::new(1)));
        }

        #[test]
        fn bounds_cover_all_vertices() {
            let mut grid = Grid::build(5, 5, 10, 8).unwrap();
            let square = cut_square(&mut grid, 1, 2);
            let line = CutLine::from_edges(square);
            assert_eq!(line.lattice_bounds(&grid), Some((1, 2, 2, 3)));
            assert_eq!(line.bounds(&grid), Some(Rect::new(10, 16, 10, 8)));
            assert_eq!(line.vertices(&grid).len(), 4);
        }

        #[test]
        fn empty_line_has_no_bounds() {
            let grid = Grid::build(2, 2, 10, 10).unwrap();
            assert!(CutLine::new().bounds(&grid).is_none());
        }

        #[test]
        fn uncut_clears_only_line_edges() {
            let mut grid = Grid::build(3, 3, 10, 10).unwrap();
            let square = cut_square(&mut grid, 0, 0);
            let other = grid.horizontal_edge(2, 3).unwrap();
            grid.set_cut(other, true);

            CutLine::from_edges(square).uncut(&mut grid);
            assert_eq!(grid.cut_edges().collect::<Vec<_>>(), vec![other]);
        }
    }

    mod trace_tests {
        use super::*;

        #[test]
        fn traces_single_cell_square() {
            let mut grid = Grid::build(3, 3, 10, 10).unwrap();
            let [top, right, bottom, left] = cut_square(&mut grid, 1, 1);

            // Arriving at (1, 1) travelling up the left edge.
            let line = grid.trace_loop(left, Direction::Backward).unwrap();
            assert_eq!(line.edges(), &[left, bottom, right, top]);
        }

        #[test]
        fn start_edge_comes_first_in_either_direction() {
            let mut grid = Grid::build(3, 3, 10, 10).unwrap();
            let [top, _, _, _] = cut_square(&mut grid, 0, 0);

            // Arriving at (1, 0) travelling right along the top edge.
            let line = grid.trace_loop(top, Direction::Forward).unwrap();
            assert_eq!(line.edges()[0], top);
            assert_eq!(line.len(), 4);
        }

        #[test]
        fn dead_end_branches_are_not_part_of_the_loop() {
            let mut grid = Grid::build(3, 3, 10, 10).unwrap();
            let [_, _, _, left] = cut_square(&mut grid, 1, 1);
            // Spur hanging below (1, 2), explored before the loop continues.
            let spur = grid.vertical_edge(1, 2).unwrap();
            grid.set_cut(spur, true);

            let line = grid.trace_loop(left, Direction::Backward).unwrap();
            assert_eq!(line.len(), 4);
            assert!(!line.contains(spur));
        }

        #[test]
        fn open_trail_finds_no_loop() {
            let mut grid = Grid::build(4, 4, 10, 10).unwrap();
            // An L-shaped trail: right along row 1, then down column 3.
            let edges = [
                grid.horizontal_edge(0, 1).unwrap(),
                grid.horizontal_edge(1, 1).unwrap(),
                grid.horizontal_edge(2, 1).unwrap(),
                grid.vertical_edge(3, 1).unwrap(),
            ];
            for edge in edges {
                grid.set_cut(edge, true);
            }
            assert!(grid.trace_loop(edges[3], Direction::Forward).is_none());
        }

        #[test]
        fn junction_with_foreign_cut_but_no_cycle_is_tolerated() {
            let mut grid = Grid::build(4, 4, 10, 10).unwrap();
            // A vertical wall down column 2 and a trail that runs into it.
            for v in 0..4 {
                grid.set_cut(grid.vertical_edge(2, v).unwrap(), true);
            }
            let first = grid.horizontal_edge(0, 2).unwrap();
            let second = grid.horizontal_edge(1, 2).unwrap();
            grid.set_cut(first, true);
            grid.set_cut(second, true);

            assert!(grid.trace_loop(second, Direction::Forward).is_none());
        }

        #[test]
        fn loop_against_another_trail_is_found() {
            let mut grid = Grid::build(4, 4, 10, 10).unwrap();
            // Someone else's wall down column 2.
            for v in 0..4 {
                grid.set_cut(grid.vertical_edge(2, v).unwrap(), true);
            }
            // Our trail leaves the wall at (2, 1), goes left, down, and back right.
            let path = [
                grid.horizontal_edge(1, 1).unwrap(),
                grid.vertical_edge(1, 1).unwrap(),
                grid.horizontal_edge(1, 2).unwrap(),
            ];
            for edge in path {
                grid.set_cut(edge, true);
            }

            // Arriving at (2, 2) travelling right.
            let line = grid.trace_loop(path[2], Direction::Forward).unwrap();
            assert_eq!(line.len(), 4);
            assert!(line.contains(grid.vertical_edge(2, 1).unwrap()));
            assert_eq!(line.lattice_bounds(&grid), Some((1, 1, 2, 2)));
        }
    }
}
