//! Move scoring engine.
//!
//! Scores one candidate cell against the current board. The regime is chosen
//! by `selected = |board ∪ {cell}|`:
//!
//! | Regime | Condition | Rule |
//! |--------|-----------|------|
//! | [`Regime::Combinatorial`] | `selected ≤ threshold` | every reachable line combination pays `base + power_base^(power_exponent − distance)`, plus flat line bonuses |
//! | [`Regime::Direct`] | `selected > threshold` | flat points for each line through the cell reaching 3, 4 or 5 cells |
//!
//! A combination is reachable when `distance = missing + selected ≤ max_cells`,
//! where `missing` counts union cells not yet occupied. Line completion
//! bonuses always land in the three-line bucket, in both regimes; downstream
//! per-bucket statistics depend on that placement.
//!
//! Each bucket is multiplied by its weight and the three are summed into
//! `total`. The result is a pure function of (config, board, cell).

use crate::catalog::catalog;
use crate::config::{ImmediateBonuses, LateScoring, MoveWeights};
use crate::constants::LINE_LEN;
use crate::error::OracleError;
use crate::types::{Board, OracleContext, ScoreBreakdown};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Regime {
    Combinatorial,
    Direct,
}

/// Regime for a position with `selected_cells` occupied after the move.
#[inline]
pub fn regime(ctx: &OracleContext, selected_cells: usize) -> Regime {
    if selected_cells > ctx.config.late_scoring.threshold {
        Regime::Direct
    } else {
        Regime::Combinatorial
    }
}

/// Unweighted accumulators.
#[derive(Clone, Copy, Debug, Default)]
struct Buckets {
    three: f64,
    four: f64,
    five: f64,
}

impl Buckets {
    /// Accumulator for `arity`. Arities come from the combination tables,
    /// which only hold 3, 4 and 5.
    fn slot(&mut self, arity: usize) -> &mut f64 {
        match arity {
            3 => &mut self.three,
            4 => &mut self.four,
            5 => &mut self.five,
            _ => unreachable!("no score bucket for {arity}-line combinations"),
        }
    }

    fn weighted(self, w: &MoveWeights) -> ScoreBreakdown {
        let three_line = self.three * w.three_line;
        let four_line = self.four * w.four_line;
        let five_line = self.five * w.five_line;
        ScoreBreakdown {
            three_line,
            four_line,
            five_line,
            total: three_line + four_line + five_line,
        }
    }
}

/// Score placing `cell` on `board`.
///
/// Fails with [`OracleError::InvalidMove`] when the cell is occupied and
/// [`OracleError::CellOutOfRange`] when it is off the board.
pub fn evaluate_move(
    ctx: &OracleContext,
    board: Board,
    cell: u8,
) -> Result<ScoreBreakdown, OracleError> {
    let after = board.try_with(cell)?;
    let selected = after.len();
    let buckets = match regime(ctx, selected) {
        Regime::Combinatorial => combinatorial_buckets(ctx, after, cell, selected),
        Regime::Direct => direct_buckets(&ctx.config.late_scoring, after, cell),
    };
    Ok(buckets.weighted(&ctx.config.weights))
}

fn combinatorial_buckets(ctx: &OracleContext, after: Board, cell: u8, selected: usize) -> Buckets {
    let cfg = &ctx.config;
    let occupied = after.mask();
    let mut buckets = Buckets::default();

    // An empty table (budget below its minimum union) simply adds nothing.
    for table in ctx.tables.iter() {
        let Some(score) = cfg.line_scores.for_arity(table.arity) else {
            continue;
        };
        let sum: f64 = table
            .iter()
            .map(|combo| combo.missing(occupied) + selected)
            .filter(|&distance| distance <= cfg.max_cells)
            .map(|distance| score.reward(distance))
            .sum();
        *buckets.slot(table.arity) += sum;
    }

    add_immediate_bonuses(&cfg.immediate_bonuses, occupied, cell, &mut buckets);
    buckets
}

/// Completion bonus for every line the move completes; only when nothing was
/// completed, the 4-cell and 3-cell bonuses for lines through the move.
fn add_immediate_bonuses(bonuses: &ImmediateBonuses, occupied: u32, cell: u8, buckets: &mut Buckets) {
    let cat = catalog();
    let mut completed = false;
    for line in cat.lines_through(cell) {
        if line.filled(occupied) as usize == LINE_LEN {
            buckets.three += bonuses.complete_line;
            completed = true;
        }
    }
    if completed {
        return;
    }
    for line in cat.lines_through(cell) {
        match line.filled(occupied) {
            4 => buckets.four += bonuses.four_cell_line,
            3 => buckets.three += bonuses.three_cell_line,
            _ => {}
        }
    }
}

fn direct_buckets(late: &LateScoring, after: Board, cell: u8) -> Buckets {
    let occupied = after.mask();
    let mut buckets = Buckets::default();
    for line in catalog().lines_through(cell) {
        match line.filled(occupied) {
            5 => buckets.three += late.complete_line,
            4 => buckets.four += late.four_cell_line,
            3 => buckets.three += late.three_cell_line,
            _ => {}
        }
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringConfig;

    fn board(cells: &[u8]) -> Board {
        Board::from_cells(cells).unwrap()
    }

    fn parts(s: ScoreBreakdown) -> (f64, f64, f64, f64) {
        (s.three_line, s.four_line, s.five_line, s.total)
    }

    #[test]
    fn test_empty_board_snapshots() {
        let ctx = OracleContext::default();
        let e = |c| parts(evaluate_move(&ctx, Board::EMPTY, c).unwrap());
        assert_eq!(e(12), (7172.0, 8368.0, 808.0, 16348.0));
        assert_eq!(e(0), (6200.0, 7840.0, 808.0, 14848.0));
        assert_eq!(e(7), (4832.0, 7160.0, 303.0, 12295.0));
    }

    #[test]
    fn test_midgame_snapshot() {
        let ctx = OracleContext::default();
        let b = board(&[0, 1, 2, 3, 4, 8, 12, 16, 17, 20]);
        assert_eq!(parts(evaluate_move(&ctx, b, 18).unwrap()), (244.0, 588.0, 0.0, 832.0));
        assert_eq!(parts(evaluate_move(&ctx, b, 6).unwrap()), (216.0, 610.0, 0.0, 826.0));
    }

    #[test]
    fn test_completion_suppresses_partial_bonuses() {
        let ctx = OracleContext::default();
        // Move 4 completes row 0 and brings column 4 to four cells.
        let completing = board(&[0, 1, 2, 3, 9, 14, 19]);
        assert_eq!(
            parts(evaluate_move(&ctx, completing, 4).unwrap()),
            (515.0, 872.0, 0.0, 1387.0)
        );
        let partial = board(&[0, 1, 2, 9, 14, 19]);
        assert_eq!(
            parts(evaluate_move(&ctx, partial, 4).unwrap()),
            (566.0, 1104.0, 0.0, 1670.0)
        );
    }

    #[test]
    fn test_regime_switches_strictly_above_threshold() {
        let ctx = OracleContext::default();
        assert_eq!(regime(&ctx, 12), Regime::Combinatorial);
        assert_eq!(regime(&ctx, 13), Regime::Direct);

        // 11 occupied + move = 12: still combinatorial.
        let eleven = board(&[0, 1, 2, 3, 6, 7, 8, 10, 11, 12, 13]);
        assert_eq!(parts(evaluate_move(&ctx, eleven, 4).unwrap()), (93.0, 52.0, 0.0, 145.0));
        assert_eq!(parts(evaluate_move(&ctx, eleven, 5).unwrap()), (35.0, 25.0, 0.0, 60.0));

        // 12 occupied + move = 13: direct rule.
        let twelve = board(&[0, 1, 2, 3, 6, 7, 8, 10, 11, 12, 13, 15]);
        // Row 0 completes (+100), anti-diagonal reaches 3 (+10).
        assert_eq!(parts(evaluate_move(&ctx, twelve, 4).unwrap()), (110.0, 0.0, 0.0, 110.0));
        // Row 1 and column 0 both reach 4.
        assert_eq!(parts(evaluate_move(&ctx, twelve, 5).unwrap()), (0.0, 50.0, 0.0, 50.0));
    }

    #[test]
    fn test_weights_scale_buckets() {
        let mut config = ScoringConfig::default();
        config.weights.four_line = 2.0;
        config.weights.five_line = 0.0;
        let ctx = OracleContext::new(config).unwrap();
        let s = evaluate_move(&ctx, Board::EMPTY, 12).unwrap();
        assert_eq!(s.four_line, 16736.0);
        assert_eq!(s.five_line, 0.0);
        assert_eq!(s.total, 7172.0 + 16736.0);
    }

    #[test]
    fn test_empty_table_scores_zero_for_that_arity() {
        let mut config = ScoringConfig::default();
        config.max_cells = 15;
        let ctx = OracleContext::new(config).unwrap();
        let s = evaluate_move(&ctx, Board::EMPTY, 12).unwrap();
        assert_eq!(s.five_line, 0.0);
        assert!(s.three_line > 0.0);
        assert!(s.four_line > 0.0);
    }

    #[test]
    fn test_every_table_arity_has_a_bucket() {
        let ctx = OracleContext::default();
        let mut buckets = Buckets::default();
        for table in ctx.tables.iter() {
            *buckets.slot(table.arity) += 1.0;
        }
        assert_eq!((buckets.three, buckets.four, buckets.five), (1.0, 1.0, 1.0));
    }

    #[test]
    #[should_panic(expected = "no score bucket")]
    fn test_unknown_arity_panics() {
        Buckets::default().slot(6);
    }

    #[test]
    fn test_occupied_cell_is_rejected() {
        let ctx = OracleContext::default();
        let b = board(&[12]);
        assert!(matches!(
            evaluate_move(&ctx, b, 12),
            Err(OracleError::InvalidMove { cell: 12 })
        ));
    }
}
