//! Pattern-recognition extension point.
//!
//! The harness asks a [`PatternDetector`] about every oracle move and
//! aggregates the named matches. Only [`LineProgressDetector`] ships with the
//! crate; it reports the same line events the scoring engine rewards.

use serde::Serialize;

use crate::catalog::catalog;
use crate::constants::{cell_bit, is_valid_cell};
use crate::types::Board;

pub const COMPLETE_LINE: &str = "complete-line";
pub const FOUR_CELL_LINE: &str = "four-cell-line";
pub const THREE_CELL_LINE: &str = "three-cell-line";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PatternMatch {
    pub name: String,
    /// Canonical line the match belongs to, when there is one.
    pub line: Option<u8>,
}

pub trait PatternDetector: Send + Sync {
    fn name(&self) -> &str;

    /// Matches produced by playing `cell` on `board` (`board` excludes `cell`).
    fn detect(&self, board: Board, cell: u8) -> Vec<PatternMatch>;
}

/// Never matches.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPatterns;

impl PatternDetector for NoPatterns {
    fn name(&self) -> &str {
        "none"
    }

    fn detect(&self, _board: Board, _cell: u8) -> Vec<PatternMatch> {
        Vec::new()
    }
}

/// Reports canonical lines completed by the move, and four- and three-cell
/// sub-lines the move completes.
#[derive(Clone, Copy, Debug, Default)]
pub struct LineProgressDetector;

impl PatternDetector for LineProgressDetector {
    fn name(&self) -> &str {
        "line-progress"
    }

    fn detect(&self, board: Board, cell: u8) -> Vec<PatternMatch> {
        if !is_valid_cell(cell) {
            return Vec::new();
        }
        let cat = catalog();
        let after = board.with(cell).mask();
        let bit = cell_bit(cell);
        let mut matches = Vec::new();

        for line in cat.lines_through(cell) {
            if line.mask & after == line.mask {
                matches.push(PatternMatch {
                    name: COMPLETE_LINE.to_string(),
                    line: Some(line.id),
                });
            }
        }
        for (name, segments) in [
            (FOUR_CELL_LINE, cat.four_cell_lines()),
            (THREE_CELL_LINE, cat.three_cell_lines()),
        ] {
            for seg in segments {
                if seg.mask & bit != 0 && seg.mask & after == seg.mask {
                    matches.push(PatternMatch {
                        name: name.to_string(),
                        line: Some(seg.parent),
                    });
                }
            }
        }
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(matches: &[PatternMatch], name: &str) -> usize {
        matches.iter().filter(|m| m.name == name).count()
    }

    #[test]
    fn test_no_patterns() {
        assert!(NoPatterns.detect(Board::EMPTY, 12).is_empty());
    }

    #[test]
    fn test_off_board_cell_matches_nothing() {
        let b = Board::from_cells(&[20, 21, 22, 23]).unwrap();
        assert!(LineProgressDetector.detect(b, 25).is_empty());
        assert!(LineProgressDetector.detect(Board::EMPTY, 200).is_empty());
    }

    #[test]
    fn test_first_move_matches_nothing() {
        assert!(LineProgressDetector.detect(Board::EMPTY, 12).is_empty());
    }

    #[test]
    fn test_three_cell_sub_line() {
        let b = Board::from_cells(&[0, 1]).unwrap();
        let m = LineProgressDetector.detect(b, 2);
        assert_eq!(count(&m, THREE_CELL_LINE), 1);
        assert_eq!(m[0].line, Some(0));
        assert_eq!(count(&m, FOUR_CELL_LINE), 0);
    }

    #[test]
    fn test_completing_a_row() {
        let b = Board::from_cells(&[0, 1, 2, 3]).unwrap();
        let m = LineProgressDetector.detect(b, 4);
        assert_eq!(count(&m, COMPLETE_LINE), 1);
        // Four-cell sub-lines of row 0 containing 4: drop any of 0..3.
        assert_eq!(count(&m, FOUR_CELL_LINE), 4);
        // Three-cell sub-lines containing 4: C(4,2) from the other cells.
        assert_eq!(count(&m, THREE_CELL_LINE), 6);
    }
}
