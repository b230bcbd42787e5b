//! Game rules: board transitions and completed-line counting.
//!
//! These are the primitives the environment boundary exposes to external
//! consumers (`reset`, `apply_move`, `valid_moves`) plus the line tallies the
//! scorer, the harness and the reward shaping share.

use crate::catalog::canonical_lines;
use crate::constants::*;
use crate::error::OracleError;
use crate::types::Board;

/// An empty board.
#[inline]
pub fn reset() -> Board {
    Board::EMPTY
}

/// Occupy `cell`. Fails with [`OracleError::InvalidMove`] if it is already
/// occupied and [`OracleError::CellOutOfRange`] if it is off the board.
#[inline]
pub fn apply_move(board: Board, cell: u8) -> Result<Board, OracleError> {
    board.try_with(cell)
}

/// Empty cells in index order.
#[inline]
pub fn valid_moves(board: Board) -> impl Iterator<Item = u8> {
    board.empty_cells()
}

/// True once `budget` cells are occupied.
#[inline]
pub fn is_game_over(board: Board, budget: usize) -> bool {
    board.len() >= budget
}

/// Number of canonical lines fully occupied. Each line counts once, however
/// many combinations it belongs to.
pub fn count_completed_lines(board: Board) -> usize {
    let occupied = board.mask();
    canonical_lines()
        .iter()
        .filter(|l| l.filled(occupied) as usize == LINE_LEN)
        .count()
}

/// Occupied-cell count of every canonical line, in catalog order.
pub fn line_fill_counts(board: Board) -> [u32; NUM_LINES] {
    let occupied = board.mask();
    let lines = canonical_lines();
    std::array::from_fn(|i| lines[i].filled(occupied))
}
