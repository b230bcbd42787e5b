//! Opening comparison: play out two candidate moves from the same position
//! and compare how many lines each tends to finish with.
//!
//! Both options use the same per-playout seeds (`seed + i`), so the random
//! opponent replies are drawn from matching streams.

use std::collections::BTreeMap;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;

use crate::error::OracleError;
use crate::game_mechanics::{apply_move, count_completed_lines};
use crate::types::{Board, OracleContext};

use super::strategy::{random_empty_cell, MovePolicy, OraclePolicy, RandomPolicy};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayoutMode {
    /// Random reply, then oracle move, until the budget is reached.
    OracleVsRandom,
    /// Every remaining cell is chosen at random.
    RandomOnly,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BestGame {
    pub game_index: usize,
    pub completed_lines: usize,
    pub final_board: Board,
}

#[derive(Clone, Debug, Serialize)]
pub struct OptionReport {
    pub cell: u8,
    pub average_lines: f64,
    pub distribution: BTreeMap<String, usize>,
    pub best_game: BestGame,
}

#[derive(Clone, Debug, Serialize)]
pub struct OpeningComparison {
    pub games: usize,
    pub mode: PlayoutMode,
    pub option_a: OptionReport,
    pub option_b: OptionReport,
    /// `option_a.average_lines - option_b.average_lines`.
    pub difference: f64,
}

fn playout(
    ctx: &OracleContext,
    start: Board,
    mode: PlayoutMode,
    rng: &mut SmallRng,
) -> Result<Board, OracleError> {
    let follow_up: &dyn MovePolicy = match mode {
        PlayoutMode::OracleVsRandom => &OraclePolicy,
        PlayoutMode::RandomOnly => &RandomPolicy,
    };
    let mut board = start;
    while !ctx.is_game_over(board) {
        board = apply_move(board, random_empty_cell(board, rng)?)?;
        if ctx.is_game_over(board) {
            break;
        }
        board = apply_move(board, follow_up.choose(ctx, board, rng)?)?;
    }
    Ok(board)
}

fn evaluate_option(
    ctx: &OracleContext,
    initial: Board,
    cell: u8,
    games: usize,
    seed: u64,
    mode: PlayoutMode,
) -> Result<OptionReport, OracleError> {
    let start = apply_move(initial, cell)?;
    let boards: Vec<Board> = (0..games)
        .into_par_iter()
        .map(|i| {
            let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(i as u64));
            playout(ctx, start, mode, &mut rng)
        })
        .collect::<Result<_, _>>()?;

    let mut distribution = BTreeMap::new();
    let mut total = 0usize;
    let mut best = BestGame {
        game_index: 0,
        completed_lines: 0,
        final_board: start,
    };
    for (i, &board) in boards.iter().enumerate() {
        let lines = count_completed_lines(board);
        total += lines;
        *distribution.entry(lines.to_string()).or_insert(0) += 1;
        if i == 0 || lines > best.completed_lines {
            best = BestGame {
                game_index: i,
                completed_lines: lines,
                final_board: board,
            };
        }
    }

    Ok(OptionReport {
        cell,
        average_lines: total as f64 / games as f64,
        distribution,
        best_game: best,
    })
}

/// Compare playing `option_a` against `option_b` on `initial_board`.
///
/// Fails with [`OracleError::InvalidMove`] if either option is occupied.
pub fn compare_openings(
    ctx: &OracleContext,
    initial_board: Board,
    option_a: u8,
    option_b: u8,
    games: usize,
    seed: u64,
    mode: PlayoutMode,
) -> Result<OpeningComparison, OracleError> {
    if games == 0 {
        return Err(OracleError::InvalidConfig(
            "opening comparison needs at least one game".to_string(),
        ));
    }
    // Reject both options before spending any playouts.
    initial_board.try_with(option_a)?;
    initial_board.try_with(option_b)?;

    let a = evaluate_option(ctx, initial_board, option_a, games, seed, mode)?;
    let b = evaluate_option(ctx, initial_board, option_b, games, seed, mode)?;
    log::debug!(
        "opening {} vs {}: {:.3} vs {:.3} lines over {} games",
        option_a,
        option_b,
        a.average_lines,
        b.average_lines,
        games
    );
    Ok(OpeningComparison {
        games,
        mode,
        difference: a.average_lines - b.average_lines,
        option_a: a,
        option_b: b,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_CELLS;

    #[test]
    fn test_occupied_option_rejected() {
        let ctx = OracleContext::default();
        let b = Board::from_cells(&[12]).unwrap();
        let r = compare_openings(&ctx, b, 12, 0, 4, 1, PlayoutMode::RandomOnly);
        assert!(matches!(r, Err(OracleError::InvalidMove { cell: 12 })));
    }

    #[test]
    fn test_random_playouts_fill_budget() {
        let ctx = OracleContext::default();
        let mut rng = SmallRng::seed_from_u64(5);
        let start = Board::from_cells(&[12]).unwrap();
        let end = playout(&ctx, start, PlayoutMode::RandomOnly, &mut rng).unwrap();
        assert_eq!(end.len(), MAX_CELLS);
        assert!(end.contains(12));
    }

    #[test]
    fn test_playout_stops_at_configured_budget() {
        let mut config = crate::config::ScoringConfig::default();
        config.max_cells = 14;
        config.late_scoring.threshold = 10;
        let ctx = OracleContext::new(config).unwrap();
        let mut rng = SmallRng::seed_from_u64(5);
        let end = playout(&ctx, Board::EMPTY.with(12), PlayoutMode::OracleVsRandom, &mut rng).unwrap();
        assert_eq!(end.len(), 14);
    }

    #[test]
    fn test_comparison_report() {
        let ctx = OracleContext::default();
        let cmp = compare_openings(&ctx, Board::EMPTY, 12, 1, 20, 7, PlayoutMode::OracleVsRandom)
            .unwrap();
        assert_eq!(cmp.games, 20);
        for r in [&cmp.option_a, &cmp.option_b] {
            assert_eq!(r.distribution.values().sum::<usize>(), 20);
            assert!(r.best_game.final_board.contains(r.cell));
            assert!(r.best_game.completed_lines as f64 >= r.average_lines);
        }
        assert_eq!(cmp.difference, cmp.option_a.average_lines - cmp.option_b.average_lines);
    }

    #[test]
    fn test_comparison_deterministic() {
        let ctx = OracleContext::default();
        let run = || {
            compare_openings(&ctx, Board::EMPTY, 0, 24, 8, 11, PlayoutMode::RandomOnly).unwrap()
        };
        let (x, y) = (run(), run());
        assert_eq!(x.option_a.distribution, y.option_a.distribution);
        assert_eq!(x.option_b.best_game, y.option_b.best_game);
    }
}
