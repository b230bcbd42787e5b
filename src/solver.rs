//! Optimal move selection: brute force over every empty cell.
//!
//! Cells are enumerated in index order 0..24 and only a strictly greater
//! total replaces the incumbent, so ties go to the lowest index.

use serde::Serialize;

use crate::error::OracleError;
use crate::game_mechanics::valid_moves;
use crate::scoring::evaluate_move;
use crate::types::{Board, OracleContext, ScoreBreakdown};

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScoredMove {
    #[serde(rename = "move")]
    pub cell: u8,
    pub score: ScoreBreakdown,
}

/// Best move plus the best move scoring strictly lower, if any.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MoveSuggestion {
    pub best: ScoredMove,
    pub second_best: Option<ScoredMove>,
}

fn ensure_playable(ctx: &OracleContext, board: Board) -> Result<(), OracleError> {
    if ctx.is_game_over(board) || valid_moves(board).next().is_none() {
        return Err(OracleError::NoValidMoves);
    }
    Ok(())
}

/// Score of every empty cell, in index order.
pub fn evaluate_all(ctx: &OracleContext, board: Board) -> Result<Vec<ScoredMove>, OracleError> {
    valid_moves(board)
        .map(|cell| {
            evaluate_move(ctx, board, cell).map(|score| ScoredMove { cell, score })
        })
        .collect()
}

/// The empty cell with the highest total, first maximum in index order.
///
/// Fails with [`OracleError::NoValidMoves`] once the cell budget is used up.
pub fn optimal_move(ctx: &OracleContext, board: Board) -> Result<ScoredMove, OracleError> {
    ensure_playable(ctx, board)?;
    let mut best: Option<ScoredMove> = None;
    for cell in valid_moves(board) {
        let score = evaluate_move(ctx, board, cell)?;
        if best.map_or(true, |b| score.total > b.score.total) {
            best = Some(ScoredMove { cell, score });
        }
    }
    let best = best.ok_or(OracleError::NoValidMoves)?;
    log::trace!("optimal move {} (total {:.1}) on {:?}", best.cell, best.score.total, board);
    Ok(best)
}

/// All moves by descending total; equal totals keep index order.
pub fn rank_moves(ctx: &OracleContext, board: Board) -> Result<Vec<ScoredMove>, OracleError> {
    ensure_playable(ctx, board)?;
    let mut moves = evaluate_all(ctx, board)?;
    moves.sort_by(|a, b| b.score.total.total_cmp(&a.score.total));
    Ok(moves)
}

/// Best move and runner-up. The runner-up must score strictly below the best;
/// when every move ties there is none.
pub fn suggest_moves(ctx: &OracleContext, board: Board) -> Result<MoveSuggestion, OracleError> {
    let ranked = rank_moves(ctx, board)?;
    let best = *ranked.first().ok_or(OracleError::NoValidMoves)?;
    let second_best = ranked
        .iter()
        .find(|m| m.score.total < best.score.total)
        .copied();
    Ok(MoveSuggestion { best, second_best })
}
