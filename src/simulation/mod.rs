//! Game simulation and statistics.
//!
//! - [`engine`]: play N independent oracle-vs-opponent games on a rayon pool
//! - [`strategy`]: move policies for each seat
//! - [`statistics`]: aggregate statistics from finished games
//! - [`compare`]: opening comparison playouts

pub mod compare;
pub mod engine;
pub mod statistics;
pub mod strategy;

pub use compare::{compare_openings, OpeningComparison, OptionReport, PlayoutMode};
pub use engine::{
    play_game, run_simulation, run_simulation_with, simulate_batch, simulate_game, BatchOutcome,
    GameFailure, GameResult, MoveRecord, SimulationOptions,
};
pub use statistics::{aggregate_statistics, PatternStatistics, ScorePatterns, SimulationStatistics};
pub use strategy::{MovePolicy, OraclePolicy, RandomPolicy};
