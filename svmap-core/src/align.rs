//! Alignment engine for distance sequences
//!
//! Fills a score grid and a path grid for a reference distance sequence
//! (rows) against a read distance sequence (columns). Scores are negative
//! for good alignments: an exact distance match contributes -1, a mismatch
//! +1, and any cell whose best candidate is not negative resets to 0, which
//! makes the alignment local.

use crate::grid::Grid;
use crate::types::Distance;
use serde::{Deserialize, Serialize};

/// Move that produced a score grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Diagonal step: one reference distance against one read distance
    Match,
    /// Reference distance skipped
    GapDown,
    /// Read distance skipped
    GapLeft,
    /// Two reference distances observed as one read distance
    MissingSite,
    /// One reference distance observed as two read distances
    ExtraSite,
    /// Adjacent pair observed swapped
    Inversion,
    /// Fresh local alignment starts here
    Reset,
    /// Cell folded into a neighbouring two-cell move
    Companion,
}

impl Move {
    /// Cells consumed by the move as (rows, cols), for walking back.
    pub fn footprint(self) -> (isize, isize) {
        match self {
            Move::Match => (1, 1),
            Move::GapDown => (1, 0),
            Move::GapLeft => (0, 1),
            Move::MissingSite => (2, 1),
            Move::ExtraSite => (1, 2),
            Move::Inversion => (2, 2),
            Move::Reset | Move::Companion => (0, 0),
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Move::Reset | Move::Companion)
    }

    /// Offset of the cell skipped over by a two-cell move.
    fn companion(self) -> Option<(usize, usize)> {
        match self {
            Move::MissingSite => Some((1, 0)),
            Move::ExtraSite => Some((0, 1)),
            Move::Inversion => Some((1, 1)),
            _ => None,
        }
    }
}

pub type ScoreGrid = Grid<i32>;
pub type PathGrid = Grid<Move>;

/// Score value written into companion cells. Positive, so it never wins a
/// best-cell scan but keeps the cell inside its island.
pub const COMPANION_SENTINEL: i32 = 1;

/// Filled grids of one alignment run.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentMatrix {
    pub scores: ScoreGrid,
    pub paths: PathGrid,
}

impl AlignmentMatrix {
    pub fn height(&self) -> usize {
        self.scores.height()
    }

    pub fn width(&self) -> usize {
        self.scores.width()
    }
}

fn eq(a: Distance, b: Distance) -> i32 {
    if a == b {
        -1
    } else {
        1
    }
}

/// Gap moves shrink a score by a factor of 1.5, truncating toward zero.
fn decay(score: i32) -> i32 {
    score * 2 / 3
}

/// Fill both grids for `reference` against `cuts`.
///
/// Cells are visited row by row; every term reads only cells at smaller or
/// equal `(i, j)`, which are final by then.
pub fn fill(reference: &[Distance], cuts: &[Distance]) -> AlignmentMatrix {
    let height = reference.len();
    let width = cuts.len();
    let mut scores = Grid::new(height, width, 0i32);
    let mut paths = Grid::new(height, width, Move::Reset);

    for i in 0..height {
        for j in 0..width {
            let (mv, score) = best_move(&scores, reference, cuts, i, j);
            scores.set(i, j, score);
            paths.set(i, j, mv);

            if let Some((di, dj)) = mv.companion() {
                let (ci, cj) = (i - di, j - dj);
                if scores.is_default(ci as isize, cj as isize) {
                    scores.set(ci, cj, COMPANION_SENTINEL);
                    paths.set(ci, cj, Move::Companion);
                }
            }
        }
    }

    log::trace!("filled {}x{} alignment grids", height, width);
    AlignmentMatrix { scores, paths }
}

fn best_move(
    scores: &ScoreGrid,
    reference: &[Distance],
    cuts: &[Distance],
    i: usize,
    j: usize,
) -> (Move, i32) {
    let (r, c) = (i as isize, j as isize);
    let at = |dr: isize, dc: isize| scores.get(r - dr, c - dc);

    let missing = if i > 0 {
        eq(reference[i] + reference[i - 1], cuts[j]) + at(2, 1)
    } else {
        0
    };
    let extra = if j > 0 {
        eq(reference[i], cuts[j] + cuts[j - 1]) + at(1, 2)
    } else {
        0
    };
    let inversion = if i > 0 && j > 0 {
        eq(reference[i], cuts[j - 1]) + eq(reference[i - 1], cuts[j]) + at(2, 2)
    } else {
        0
    };

    // Listed in tie-break priority order
    let candidates = [
        (Move::Match, eq(reference[i], cuts[j]) + at(1, 1)),
        (Move::GapDown, decay(at(1, 0))),
        (Move::GapLeft, decay(at(0, 1))),
        (Move::MissingSite, missing),
        (Move::ExtraSite, extra),
        (Move::Inversion, inversion),
    ];

    candidates
        .iter()
        .fold((Move::Reset, 0), |best, &(mv, score)| {
            if score < best.1 {
                (mv, score)
            } else {
                best
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decay_truncates_toward_zero() {
        assert_eq!(decay(-1), 0);
        assert_eq!(decay(-2), -1);
        assert_eq!(decay(-3), -2);
        assert_eq!(decay(-6), -4);
        assert_eq!(decay(0), 0);
    }

    #[test]
    fn test_self_alignment_diagonal() {
        let reference = [10, 20, 30, 40, 50];
        let matrix = fill(&reference, &reference);

        for k in 0..5 {
            assert_eq!(matrix.scores.get(k, k), -(k as i32) - 1);
            assert_eq!(matrix.paths.get(k, k), Move::Match);
        }
        // Decayed gap next to the diagonal
        assert_eq!(matrix.scores.get(2, 1), -1);
        assert_eq!(matrix.paths.get(2, 1), Move::GapDown);
        assert_eq!(matrix.paths.get(0, 3), Move::Reset);
    }

    #[test]
    fn test_missing_site_move() {
        let reference = [10, 20, 30, 40, 50];
        let read = [10, 50, 40, 50];
        let matrix = fill(&reference, &read);

        assert_eq!(matrix.paths.get(2, 1), Move::MissingSite);
        assert_eq!(matrix.scores.get(2, 1), -2);
        assert_eq!(matrix.scores.get(4, 3), -4);
    }

    #[test]
    fn test_companion_cell_marked() {
        let reference = [10, 20, 30, 40, 50];
        let read = [10, 50, 40, 50];
        let matrix = fill(&reference, &read);

        // (1, 1) was reset before the missing-site move at (2, 1) claimed it
        assert_eq!(matrix.paths.get(1, 1), Move::Companion);
        assert_eq!(matrix.scores.get(1, 1), COMPANION_SENTINEL);
    }

    #[test]
    fn test_extra_site_move() {
        let reference = [15, 25, 35, 45];
        let read = [15, 5, 20, 35, 45];
        let matrix = fill(&reference, &read);

        assert_eq!(matrix.paths.get(1, 2), Move::ExtraSite);
        assert_eq!(matrix.scores.get(1, 2), -2);
        assert_eq!(matrix.scores.get(3, 4), -4);
    }

    #[test]
    fn test_inversion_move() {
        let reference = [11, 22, 33, 44, 55];
        let read = [11, 33, 22, 44, 55];
        let matrix = fill(&reference, &read);

        assert_eq!(matrix.paths.get(2, 2), Move::Inversion);
        assert_eq!(matrix.scores.get(2, 2), -3);
        assert_eq!(matrix.scores.get(4, 4), -5);
    }

    #[test]
    fn test_no_match_stays_reset() {
        let matrix = fill(&[1, 2, 3], &[7, 8]);
        assert!(matrix.scores.iter().all(|(_, _, s)| s == 0));
        assert!(matrix.paths.iter().all(|(_, _, m)| m == Move::Reset));
    }

    #[test]
    fn test_empty_inputs() {
        let matrix = fill(&[], &[1, 2]);
        assert_eq!(matrix.height(), 0);
        assert_eq!(matrix.width(), 2);
    }
}
