//! Core data structures: board bitset, score breakdown and the oracle context.
//!
//! The central type is [`OracleContext`], which holds the validated scoring
//! config and a shared handle to the combination tables. It is built once and
//! then shared immutably across rayon workers and HTTP handlers.

use std::fmt;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::combinations::CombinationTables;
use crate::config::ScoringConfig;
use crate::constants::*;
use crate::error::OracleError;
use crate::game_mechanics;

/// Set of occupied cells as a 25-bit mask.
///
/// Membership, union and intersection are single bit operations; the
/// intersection size with a line is a popcount.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Board(u32);

impl Board {
    pub const EMPTY: Board = Board(0);

    /// Bits above 24 are dropped.
    #[inline(always)]
    pub fn from_mask(mask: u32) -> Self {
        Board(mask & FULL_BOARD_MASK)
    }

    /// Build a board from a cell list. Duplicates are rejected as
    /// [`OracleError::InvalidMove`]. Any number of cells up to 25 is
    /// accepted; [`OracleContext::board_from_cells`] also enforces the budget.
    pub fn from_cells(cells: &[u8]) -> Result<Self, OracleError> {
        cells.iter().try_fold(Board::EMPTY, |b, &c| b.try_with(c))
    }

    #[inline(always)]
    pub fn mask(self) -> u32 {
        self.0
    }

    #[inline(always)]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline(always)]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub fn contains(self, cell: u8) -> bool {
        is_valid_cell(cell) && self.0 & cell_bit(cell) != 0
    }

    /// Board with `cell` added, without occupancy checks. Off-board cells
    /// leave the board unchanged.
    #[inline(always)]
    pub fn with(self, cell: u8) -> Board {
        if !is_valid_cell(cell) {
            return self;
        }
        Board(self.0 | cell_bit(cell))
    }

    /// Board with `cell` added; fails if the cell is off-board or occupied.
    pub fn try_with(self, cell: u8) -> Result<Board, OracleError> {
        if !is_valid_cell(cell) {
            return Err(OracleError::CellOutOfRange { cell });
        }
        if self.contains(cell) {
            return Err(OracleError::InvalidMove { cell });
        }
        Ok(self.with(cell))
    }

    /// Occupied cells in ascending order.
    pub fn cells(self) -> impl Iterator<Item = u8> {
        (0..BOARD_CELLS as u8).filter(move |&c| self.0 & cell_bit(c) != 0)
    }

    /// Empty cells in ascending order.
    pub fn empty_cells(self) -> impl Iterator<Item = u8> {
        (0..BOARD_CELLS as u8).filter(move |&c| self.0 & cell_bit(c) == 0)
    }

    /// The board rotated 90° clockwise.
    pub fn rotated(self) -> Board {
        self.cells()
            .fold(Board::EMPTY, |b, c| b.with(rotate_cell(c)))
    }

    /// The board mirrored left-to-right.
    pub fn flipped(self) -> Board {
        self.cells().fold(Board::EMPTY, |b, c| b.with(flip_cell(c)))
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.cells()).finish()
    }
}

impl fmt::Display for Board {
    /// Five rows of `X` (occupied) and `.` (empty).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_SIDE {
            for col in 0..BOARD_SIDE {
                let c = if self.contains(cell_index(row, col)) { 'X' } else { '.' };
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{c}")?;
            }
            if row + 1 < BOARD_SIDE {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for c in self.cells() {
            seq.serialize_element(&c)?;
        }
        seq.end()
    }
}

/// Weighted score of one candidate move, per combination class.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct ScoreBreakdown {
    pub three_line: f64,
    pub four_line: f64,
    pub five_line: f64,
    pub total: f64,
}

/// Which seat made a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mover {
    Oracle,
    Opponent,
}

/// Validated scoring config plus the combination tables for its budget.
#[derive(Clone, Debug)]
pub struct OracleContext {
    pub config: ScoringConfig,
    pub tables: Arc<CombinationTables>,
}

impl OracleContext {
    pub fn new(config: ScoringConfig) -> Result<Self, OracleError> {
        config.validate()?;
        let tables = CombinationTables::for_budget(config.max_cells);
        if let Err(e) = tables.check_feasible() {
            log::warn!("{e}; that arity will always score zero");
        }
        Ok(Self { config, tables })
    }

    /// Configured cell budget.
    #[inline]
    pub fn budget(&self) -> usize {
        self.config.max_cells
    }

    /// True once the configured budget is used up.
    #[inline]
    pub fn is_game_over(&self, board: Board) -> bool {
        game_mechanics::is_game_over(board, self.budget())
    }

    /// Like [`Board::from_cells`], but also rejects boards over the budget.
    pub fn board_from_cells(&self, cells: &[u8]) -> Result<Board, OracleError> {
        let board = Board::from_cells(cells)?;
        if board.len() > self.budget() {
            return Err(OracleError::BudgetExceeded {
                cells: board.len(),
                budget: self.budget(),
            });
        }
        Ok(board)
    }
}

impl Default for OracleContext {
    fn default() -> Self {
        Self {
            config: ScoringConfig::default(),
            tables: CombinationTables::shared(),
        }
    }
}
