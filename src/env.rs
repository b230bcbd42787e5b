//! Episodic environment for external learners.
//!
//! Each `step` applies the learner's move and then the automatic reply. The
//! episode budget defaults to 16 cells and can be set with
//! [`BingoEnv::with_budget`]. The reward is shaped from line progress until
//! the budget is reached, then switches to a tiered payout on completed lines:
//!
//! | Completed lines | Terminal reward |
//! |-----------------|-----------------|
//! | ≥ 5 | 100 |
//! | 4 | 30 |
//! | 3 | 5 |
//! | n < 3 | n |

use serde::Serialize;

use crate::constants::{BOARD_CELLS, MAX_CELLS};
use crate::error::OracleError;
use crate::game_mechanics::{self, count_completed_lines, is_game_over, line_fill_counts};
use crate::types::{Board, OracleContext};

const SHAPING_SCALE: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StepOutcome {
    pub board: Board,
    pub reward: f64,
    pub done: bool,
}

#[derive(Clone, Debug)]
pub struct BingoEnv {
    board: Board,
    budget: usize,
}

impl Default for BingoEnv {
    fn default() -> Self {
        Self {
            board: Board::EMPTY,
            budget: MAX_CELLS,
        }
    }
}

impl BingoEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Episodes end after `budget` cells, clamped to the board size.
    pub fn with_budget(budget: usize) -> Self {
        Self {
            board: Board::EMPTY,
            budget: budget.clamp(1, BOARD_CELLS),
        }
    }

    /// Environment matching a context's configured budget.
    pub fn for_context(ctx: &OracleContext) -> Self {
        Self::with_budget(ctx.budget())
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    pub fn reset(&mut self) -> Board {
        self.board = game_mechanics::reset();
        self.board
    }

    pub fn board(&self) -> Board {
        self.board
    }

    pub fn valid_moves(&self) -> Vec<u8> {
        game_mechanics::valid_moves(self.board).collect()
    }

    pub fn is_done(&self) -> bool {
        is_game_over(self.board, self.budget)
    }

    /// Apply `player_move` and then `auto_move`. The reply is skipped when
    /// the player's move exhausts the budget. On error the episode is left
    /// as it was.
    pub fn step(&mut self, player_move: u8, auto_move: u8) -> Result<StepOutcome, OracleError> {
        if self.is_done() {
            return Err(OracleError::NoValidMoves);
        }
        let mut next = game_mechanics::apply_move(self.board, player_move)?;
        if next.len() < self.budget {
            next = game_mechanics::apply_move(next, auto_move)?;
        }
        self.board = next;

        let done = is_game_over(next, self.budget);
        let reward = if done {
            terminal_reward(count_completed_lines(next))
        } else {
            SHAPING_SCALE * line_potential(next)
        };
        Ok(StepOutcome { board: next, reward, done })
    }
}

/// Tiered payout on the final completed-line count.
pub fn terminal_reward(completed_lines: usize) -> f64 {
    match completed_lines {
        n if n >= 5 => 100.0,
        4 => 30.0,
        3 => 5.0,
        n => n as f64,
    }
}

/// Progress potential: 2.0 per line with four cells, 1.0 with three, 0.5 with two.
pub fn line_potential(board: Board) -> f64 {
    line_fill_counts(board)
        .iter()
        .map(|&filled| match filled {
            4 => 2.0,
            3 => 1.0,
            2 => 0.5,
            _ => 0.0,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_tiers() {
        assert_eq!(terminal_reward(0), 0.0);
        assert_eq!(terminal_reward(2), 2.0);
        assert_eq!(terminal_reward(3), 5.0);
        assert_eq!(terminal_reward(4), 30.0);
        assert_eq!(terminal_reward(5), 100.0);
        assert_eq!(terminal_reward(9), 100.0);
    }

    #[test]
    fn test_line_potential() {
        assert_eq!(line_potential(Board::EMPTY), 0.0);
        // Row 0 has 2, columns 0 and 1 have 1 each.
        let b = Board::from_cells(&[0, 1]).unwrap();
        assert_eq!(line_potential(b), 0.5);
        // Row 0 has 4; main diagonal (0) and anti-diagonal (4 absent) stay low.
        let b = Board::from_cells(&[0, 1, 2, 3]).unwrap();
        assert_eq!(line_potential(b), 2.0);
    }

    #[test]
    fn test_step_applies_both_moves() {
        let mut env = BingoEnv::new();
        let out = env.step(0, 1).unwrap();
        assert_eq!(out.board.cells().collect::<Vec<_>>(), vec![0, 1]);
        assert!(!out.done);
        assert!((out.reward - 0.05).abs() < 1e-12);
        assert_eq!(env.valid_moves().len(), 23);
    }

    #[test]
    fn test_invalid_step_leaves_state() {
        let mut env = BingoEnv::new();
        env.step(0, 1).unwrap();
        assert!(matches!(env.step(1, 2), Err(OracleError::InvalidMove { cell: 1 })));
        // Reply collides with the player's move.
        assert!(matches!(env.step(5, 5), Err(OracleError::InvalidMove { cell: 5 })));
        assert_eq!(env.board().len(), 2);
    }

    #[test]
    fn test_episode_ends_at_budget() {
        let mut env = BingoEnv::new();
        let mut last = None;
        for pair in (0..16u8).collect::<Vec<_>>().chunks(2) {
            last = Some(env.step(pair[0], pair[1]).unwrap());
        }
        let out = last.unwrap();
        assert!(out.done);
        // Rows 0..2 complete: cells 0..15 cover rows 0, 1 and 2.
        assert_eq!(out.reward, 5.0);
        assert!(matches!(env.step(20, 21), Err(OracleError::NoValidMoves)));
        env.reset();
        assert!(env.board().is_empty());
    }

    #[test]
    fn test_episode_ends_at_custom_budget() {
        let mut env = BingoEnv::with_budget(6);
        env.step(0, 1).unwrap();
        env.step(2, 3).unwrap();
        let out = env.step(4, 9).unwrap();
        assert!(out.done);
        assert_eq!(out.board.len(), 6);
        // Row 0 complete: one line.
        assert_eq!(out.reward, 1.0);

        // An odd budget skips the final reply.
        let mut env = BingoEnv::with_budget(3);
        env.step(0, 1).unwrap();
        let out = env.step(2, 3).unwrap();
        assert!(out.done);
        assert_eq!(out.board.len(), 3);
        assert!(!out.board.contains(3));
    }
}
