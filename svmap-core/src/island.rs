//! Island extraction over a filled score grid
//!
//! An island is a maximal connected region of non-default score cells. The
//! flood fill consumes cells as it claims them, so every cell belongs to at
//! most one island.

use crate::align::ScoreGrid;
use serde::{Deserialize, Serialize};

/// Neighbour offsets followed by the flood fill. There is no (-1,-1) or
/// (-1,+1) link: the recurrence only ever moves forward.
const NEIGHBOURS: [(isize, isize); 5] = [(-1, 0), (1, 0), (0, -1), (0, 1), (1, 1)];

/// One connected region of the score grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Island {
    pub min_row: usize,
    pub min_col: usize,
    pub best_row: usize,
    pub best_col: usize,
    /// Minimum score in the region
    pub best: i32,
    pub cells: usize,
}

impl Island {
    fn seed(row: usize, col: usize, value: i32) -> Self {
        Self {
            min_row: row,
            min_col: col,
            best_row: row,
            best_col: col,
            best: value,
            cells: 1,
        }
    }

    /// Fold one claimed cell into the island.
    ///
    /// The bounding corner follows every cell; the best cell moves on a
    /// strictly lower score, or on an equal score further along in row-major
    /// order, so the result does not depend on flood-fill order.
    pub fn absorb(&mut self, row: usize, col: usize, value: i32) {
        self.min_row = self.min_row.min(row);
        self.min_col = self.min_col.min(col);
        self.cells += 1;

        if value < self.best
            || (value == self.best && (row, col) > (self.best_row, self.best_col))
        {
            self.best = value;
            self.best_row = row;
            self.best_col = col;
        }
    }

    /// True when either island's minimum corner lies strictly inside the
    /// other's span (minimum corner to best cell), by row or by column.
    ///
    /// Partial overlaps that keep both minimum corners outside the other span
    /// are not detected.
    pub fn conflicts(&self, other: &Island) -> bool {
        fn inside(lo: usize, x: usize, hi: usize) -> bool {
            lo < x && x < hi
        }

        inside(self.min_row, other.min_row, self.best_row)
            || inside(self.min_col, other.min_col, self.best_col)
            || inside(other.min_row, self.min_row, other.best_row)
            || inside(other.min_col, self.min_col, other.best_col)
    }

    pub fn conflicts_with_any(&self, others: &[Island]) -> bool {
        others.iter().any(|other| self.conflicts(other))
    }

    /// Alignment strength as a positive number.
    pub fn support(&self) -> i32 {
        -self.best
    }
}

/// Extract every island of `scores`, consuming the grid.
///
/// Islands whose support is below `min_support` are dropped. Each returned
/// island has been claimed in full, so the grid is all default afterwards.
pub fn extract_islands(scores: &mut ScoreGrid, min_support: i32) -> Vec<Island> {
    let mut islands = Vec::new();
    let mut discarded = 0usize;
    let mut work = Vec::new();

    for row in 0..scores.height() {
        for col in 0..scores.width() {
            let (r, c) = (row as isize, col as isize);
            if scores.is_default(r, c) {
                continue;
            }

            let mut island = Island::seed(row, col, scores.clear(r, c));
            work.push((r, c));

            while let Some((r, c)) = work.pop() {
                for (dr, dc) in NEIGHBOURS {
                    let (nr, nc) = (r + dr, c + dc);
                    if scores.is_default(nr, nc) {
                        continue;
                    }
                    let value = scores.clear(nr, nc);
                    island.absorb(nr as usize, nc as usize, value);
                    work.push((nr, nc));
                }
            }

            if island.support() >= min_support {
                islands.push(island);
            } else {
                discarded += 1;
            }
        }
    }

    log::debug!(
        "extracted {} islands ({} below support {})",
        islands.len(),
        discarded,
        min_support
    );
    islands
}
