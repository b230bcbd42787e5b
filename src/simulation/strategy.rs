//! Move policies for simulated games.
//!
//! A [`MovePolicy`] picks one empty cell for the seat it plays. The harness
//! pairs an oracle seat with an opponent seat; the defaults are
//! [`OraclePolicy`] against [`RandomPolicy`].

use rand::rngs::SmallRng;
use rand::Rng;

use crate::constants::BOARD_CELLS;
use crate::error::OracleError;
use crate::game_mechanics::valid_moves;
use crate::solver::optimal_move;
use crate::types::{Board, OracleContext};

pub trait MovePolicy: Send + Sync {
    fn name(&self) -> &str;

    fn choose(&self, ctx: &OracleContext, board: Board, rng: &mut SmallRng)
        -> Result<u8, OracleError>;
}

/// Plays the oracle's optimal move.
#[derive(Clone, Copy, Debug, Default)]
pub struct OraclePolicy;

impl MovePolicy for OraclePolicy {
    fn name(&self) -> &str {
        "oracle"
    }

    fn choose(&self, ctx: &OracleContext, board: Board, _rng: &mut SmallRng) -> Result<u8, OracleError> {
        optimal_move(ctx, board).map(|m| m.cell)
    }
}

/// Uniformly random empty cell.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomPolicy;

impl MovePolicy for RandomPolicy {
    fn name(&self) -> &str {
        "random"
    }

    fn choose(&self, _ctx: &OracleContext, board: Board, rng: &mut SmallRng) -> Result<u8, OracleError> {
        random_empty_cell(board, rng)
    }
}

/// Uniform draw over the empty cells of `board`.
pub fn random_empty_cell(board: Board, rng: &mut SmallRng) -> Result<u8, OracleError> {
    let empty = BOARD_CELLS - board.len();
    if empty == 0 {
        return Err(OracleError::NoValidMoves);
    }
    let pick = rng.random_range(0..empty);
    valid_moves(board).nth(pick).ok_or(OracleError::NoValidMoves)
}
