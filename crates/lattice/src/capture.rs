//! Region capture: deciding which cells a cut line encloses.
//!
//! The resolver runs a scanline parity test over the cut line's bounding box.
//! Each row is scanned left to right with an *inside* flag that flips every
//! time the scan crosses the left edge of a cell where that edge is cut and
//! both of its endpoints lie on the line. Such an edge need not be a member
//! of the line itself: a cut chord between two loop vertices also flips the
//! flag. Cells scanned while inside are candidates.
//!
//! The right-most boundary of the box is never scanned as a left edge, so a
//! row that is still inside when it ends is kept only if the last cell's right
//! edge qualifies by the same rule. A row left open any other way was
//! mis-detected and all of its candidates are discarded.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::topology::{CellId, EdgeId, Grid, VertexId};
use crate::trace::CutLine;

/// Outcome of committing a cut line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capture {
    /// Every cell the line encloses, row by row.
    pub enclosed: Vec<CellId>,
    /// Enclosed cells that were not already empty.
    pub newly_captured: Vec<CellId>,
}

impl Capture {
    /// Points earned: the number of newly captured cells.
    #[must_use]
    pub fn score(&self) -> usize {
        self.newly_captured.len()
    }

    /// True if nothing changed hands.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.newly_captured.is_empty()
    }
}

impl Grid {
    fn bounds_loop(&self, loop_vertices: &BTreeSet<VertexId>, edge: EdgeId) -> bool {
        let e = self.edge(edge);
        self.is_cut(edge) && loop_vertices.contains(&e.from()) && loop_vertices.contains(&e.to())
    }

    /// Cells enclosed by `line`, without modifying the grid.
    #[must_use]
    pub fn enclosed_cells(&self, line: &CutLine) -> Vec<CellId> {
        let Some((h_min, v_min, h_max, v_max)) = line.lattice_bounds(self) else {
            return Vec::new();
        };
        let loop_vertices = line.vertices(self);

        let mut enclosed = Vec::new();
        for v in v_min..v_max {
            let mut inside = false;
            let mut row = Vec::new();
            let mut last = None;

            for h in h_min..h_max {
                let Some(cell) = self.cell_at(h, v) else {
                    continue;
                };
                if self.bounds_loop(&loop_vertices, self.cell(cell).left()) {
                    inside = !inside;
                }
                if inside {
                    row.push(cell);
                }
                last = Some(cell);
            }

            if inside {
                let closed = last.is_some_and(|cell| {
                    self.bounds_loop(&loop_vertices, self.cell(cell).right())
                });
                if !closed {
                    trace!(row = v, candidates = row.len(), "open row rolled back");
                    continue;
                }
            }
            enclosed.extend(row);
        }
        enclosed
    }

    /// Commits a cut line: marks enclosed cells empty and consumes the line's
    /// cuts.
    ///
    /// Cells already empty stay empty and do not count again. A line that
    /// encloses nothing is valid and yields an empty [`Capture`].
    pub fn capture(&mut self, line: &CutLine) -> Capture {
        let enclosed = self.enclosed_cells(line);
        let newly_captured: Vec<CellId> = enclosed
            .iter()
            .copied()
            .filter(|cell| self.capture_cell(*cell))
            .collect();
        line.uncut(self);

        debug!(
            line = line.len(),
            enclosed = enclosed.len(),
            captured = newly_captured.len(),
            "cut line resolved"
        );
        Capture {
            enclosed,
            newly_captured,
        }
    }
}
