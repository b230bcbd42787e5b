//! Game simulation engine: plays N independent oracle-vs-opponent games.
//!
//! A game alternates oracle move, opponent move from the empty board until
//! the cell budget is used up, then tallies completed canonical lines. Each
//! game owns its board and a `SmallRng` seeded with `seed + game_index`, so a
//! batch is reproducible regardless of worker count or completion order.
//!
//! ## Isolation
//!
//! A policy error or an illegal move ends that game only; it is reported as a
//! [`GameFailure`] and the rest of the batch carries on. Cancellation is
//! checked at game boundaries, so an abandoned game never reaches
//! aggregation half-played.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;

use crate::error::OracleError;
use crate::game_mechanics::{apply_move, count_completed_lines, reset};
use crate::patterns::{NoPatterns, PatternDetector, PatternMatch};
use crate::scoring::evaluate_move;
use crate::types::{Board, Mover, OracleContext, ScoreBreakdown};

use super::statistics::{aggregate_statistics, SimulationStatistics};
use super::strategy::{MovePolicy, OraclePolicy, RandomPolicy};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    pub cell: u8,
    pub mover: Mover,
}

/// One finished game.
#[derive(Clone, Debug, Serialize)]
pub struct GameResult {
    pub game_index: usize,
    pub completed_lines: usize,
    pub final_board: Board,
    /// Every move in play order, both seats.
    pub moves: Vec<MoveRecord>,
    /// Score of each oracle move at the time it was played.
    pub oracle_scores: Vec<ScoreBreakdown>,
    pub patterns: Vec<PatternMatch>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GameFailure {
    pub game_index: usize,
    pub message: String,
}

/// Raw batch output before aggregation. `results` is in game-index order.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub results: Vec<GameResult>,
    pub failures: Vec<GameFailure>,
    pub cancelled: usize,
}

enum GameOutcome {
    Finished(GameResult),
    Failed(GameFailure),
    Cancelled,
}

/// Batch parameters. `new` seats the oracle against a uniform random
/// opponent with no pattern detector.
#[derive(Clone, Copy)]
pub struct SimulationOptions<'a> {
    pub games: usize,
    pub workers: usize,
    pub seed: u64,
    pub oracle: &'a dyn MovePolicy,
    pub opponent: &'a dyn MovePolicy,
    pub detector: &'a dyn PatternDetector,
    pub cancel: Option<&'a AtomicBool>,
}

impl SimulationOptions<'static> {
    pub fn new(games: usize, workers: usize, seed: u64) -> Self {
        Self {
            games,
            workers,
            seed,
            oracle: &OraclePolicy,
            opponent: &RandomPolicy,
            detector: &NoPatterns,
            cancel: None,
        }
    }
}

impl<'a> SimulationOptions<'a> {
    pub fn with_policies(self, oracle: &'a dyn MovePolicy, opponent: &'a dyn MovePolicy) -> Self {
        Self { oracle, opponent, ..self }
    }

    pub fn with_detector(self, detector: &'a dyn PatternDetector) -> Self {
        Self { detector, ..self }
    }

    pub fn with_cancel(self, cancel: &'a AtomicBool) -> Self {
        Self {
            cancel: Some(cancel),
            ..self
        }
    }
}

/// Play one game until the context's cell budget is used up.
pub fn play_game(
    ctx: &OracleContext,
    oracle: &dyn MovePolicy,
    opponent: &dyn MovePolicy,
    detector: &dyn PatternDetector,
    game_index: usize,
    rng: &mut SmallRng,
) -> Result<GameResult, OracleError> {
    let mut board = reset();
    let mut moves = Vec::with_capacity(ctx.budget());
    let mut oracle_scores = Vec::new();
    let mut patterns = Vec::new();

    while !ctx.is_game_over(board) {
        let cell = oracle.choose(ctx, board, rng)?;
        oracle_scores.push(evaluate_move(ctx, board, cell)?);
        patterns.extend(detector.detect(board, cell));
        board = apply_move(board, cell)?;
        moves.push(MoveRecord {
            cell,
            mover: Mover::Oracle,
        });

        if ctx.is_game_over(board) {
            break;
        }
        let cell = opponent.choose(ctx, board, rng)?;
        board = apply_move(board, cell)?;
        moves.push(MoveRecord {
            cell,
            mover: Mover::Opponent,
        });
    }

    Ok(GameResult {
        game_index,
        completed_lines: count_completed_lines(board),
        final_board: board,
        moves,
        oracle_scores,
        patterns,
    })
}

/// Play one game with the default seats and per-game seeding.
pub fn simulate_game(ctx: &OracleContext, seed: u64, game_index: usize) -> Result<GameResult, OracleError> {
    let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(game_index as u64));
    play_game(ctx, &OraclePolicy, &RandomPolicy, &NoPatterns, game_index, &mut rng)
}

/// Play `opts.games` games on a dedicated pool of `opts.workers` threads.
///
/// Only pool construction can fail; per-game errors are collected in
/// [`BatchOutcome::failures`].
pub fn simulate_batch(ctx: &OracleContext, opts: &SimulationOptions) -> Result<BatchOutcome, OracleError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opts.workers.max(1))
        .build()?;
    let start = Instant::now();

    let outcomes: Vec<GameOutcome> = pool.install(|| {
        (0..opts.games)
            .into_par_iter()
            .map(|i| {
                if opts.cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
                    return GameOutcome::Cancelled;
                }
                let mut rng = SmallRng::seed_from_u64(opts.seed.wrapping_add(i as u64));
                match play_game(ctx, opts.oracle, opts.opponent, opts.detector, i, &mut rng) {
                    Ok(result) => GameOutcome::Finished(result),
                    Err(e) => {
                        log::warn!("game {i} failed: {e}");
                        GameOutcome::Failed(GameFailure {
                            game_index: i,
                            message: e.to_string(),
                        })
                    }
                }
            })
            .collect()
    });

    let mut batch = BatchOutcome::default();
    for outcome in outcomes {
        match outcome {
            GameOutcome::Finished(r) => batch.results.push(r),
            GameOutcome::Failed(f) => batch.failures.push(f),
            GameOutcome::Cancelled => batch.cancelled += 1,
        }
    }

    let elapsed = start.elapsed();
    log::info!(
        "{} games ({} failed, {} cancelled) on {} workers in {:.2?} ({:.0} games/s)",
        batch.results.len(),
        batch.failures.len(),
        batch.cancelled,
        opts.workers.max(1),
        elapsed,
        batch.results.len() as f64 / elapsed.as_secs_f64().max(1e-9),
    );
    Ok(batch)
}

/// Run a batch and aggregate it.
pub fn run_simulation_with(
    ctx: &OracleContext,
    opts: &SimulationOptions,
) -> Result<SimulationStatistics, OracleError> {
    let batch = simulate_batch(ctx, opts)?;
    Ok(aggregate_statistics(&batch.results, batch.failures.len(), batch.cancelled))
}

/// Oracle vs uniform random opponent, `game_count` games on `worker_count`
/// threads.
pub fn run_simulation(
    ctx: &OracleContext,
    game_count: usize,
    worker_count: usize,
    seed: u64,
) -> Result<SimulationStatistics, OracleError> {
    run_simulation_with(ctx, &SimulationOptions::new(game_count, worker_count, seed))
}
