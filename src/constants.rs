//! Board geometry constants and cell-indexing functions.
//!
//! Cells are numbered row-major: `cell = row * 5 + col`, so the board fits in
//! the low 25 bits of a `u32` ([`FULL_BOARD_MASK`]). Every line, combination
//! union and board state in the crate is a mask over those bits.

/// Side length of the square board.
pub const BOARD_SIDE: usize = 5;

/// Number of cells on the board.
pub const BOARD_CELLS: usize = BOARD_SIDE * BOARD_SIDE;

/// Bits 0..25 set.
pub const FULL_BOARD_MASK: u32 = (1 << BOARD_CELLS) - 1;

/// Cell budget: a game ends once this many cells are occupied.
pub const MAX_CELLS: usize = 16;

/// Occupied-cell count (after the candidate move) up to which the
/// combinatorial regime is used. Above it the direct line rule takes over.
pub const PHASE_THRESHOLD: usize = 12;

/// Cells in a canonical line.
pub const LINE_LEN: usize = 5;

/// Number of canonical lines: 5 rows, 5 columns, 2 diagonals.
pub const NUM_LINES: usize = 12;

/// Canonical line ids. Rows are 0-4, columns 5-9, diagonals 12 and 13
/// (ids 10 and 11 are unused).
pub const LINE_IDS: [u8; NUM_LINES] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 12, 13];

/// Id of the main diagonal (top-left to bottom-right).
pub const MAIN_DIAGONAL_ID: u8 = 12;

/// Id of the anti-diagonal (top-right to bottom-left).
pub const ANTI_DIAGONAL_ID: u8 = 13;

/// Arities of the line-combination tables, in bucket order (three, four, five).
pub const COMBINATION_ARITIES: [usize; 3] = [3, 4, 5];

/// Upper bound on completed lines reported by the statistics layer.
/// Histograms carry one bucket per count in `0..=MAX_COMPLETED_LINES`.
pub const MAX_COMPLETED_LINES: usize = 13;

/// Map (row, col) to a cell index.
#[inline(always)]
pub fn cell_index(row: usize, col: usize) -> u8 {
    (row * BOARD_SIDE + col) as u8
}

#[inline(always)]
pub fn cell_row(cell: u8) -> usize {
    cell as usize / BOARD_SIDE
}

#[inline(always)]
pub fn cell_col(cell: u8) -> usize {
    cell as usize % BOARD_SIDE
}

/// Single-bit mask for a cell.
#[inline(always)]
pub fn cell_bit(cell: u8) -> u32 {
    1u32 << cell
}

#[inline(always)]
pub fn is_valid_cell(cell: u8) -> bool {
    (cell as usize) < BOARD_CELLS
}

/// Rotate a cell 90° clockwise: (r, c) → (c, 4 − r).
#[inline]
pub fn rotate_cell(cell: u8) -> u8 {
    cell_index(cell_col(cell), BOARD_SIDE - 1 - cell_row(cell))
}

/// Mirror a cell left-to-right: (r, c) → (r, 4 − c).
#[inline]
pub fn flip_cell(cell: u8) -> u8 {
    cell_index(cell_row(cell), BOARD_SIDE - 1 - cell_col(cell))
}
