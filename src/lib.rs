//! # Bingo oracle: move scoring for 5×5 line bingo
//!
//! Players occupy cells of a 5×5 board; at most 16 cells are ever occupied in
//! one game. The oracle scores each empty cell by how much it advances the
//! 12 canonical lines (5 rows, 5 columns, 2 diagonals) and picks the best.
//!
//! ## Pipeline
//!
//! | Stage | Rust module | Description |
//! |-------|-------------|-------------|
//! | Line catalog | [`catalog`] | 12 canonical lines as 25-bit masks, plus their 4- and 3-cell sub-lines |
//! | Combination tables | [`combinations`] | every 3/4/5-subset of lines whose union fits the cell budget, built once per process |
//! | Move scoring | [`scoring`] | combinatorial regime up to 12 occupied cells, direct line rule after |
//! | Move selection | [`solver`] | first maximum over empty cells; ranking and runner-up suggestions |
//! | Simulation | [`simulation`] | oracle vs random games on a rayon pool, aggregate statistics |
//!
//! ## Board representation
//!
//! Cell `i = row * 5 + col` is bit `i` of a `u32` ([`types::Board`]). Line
//! membership is a mask test and "cells filled on a line" is
//! `(board & line.mask).count_ones()`.
//!
//! Scoring constants live in a frozen [`config::ScoringConfig`], validated once
//! when the [`types::OracleContext`] is built and passed by reference from then on.

pub mod catalog;
pub mod combinations;
pub mod config;
pub mod constants;
pub mod env;
pub mod env_config;
pub mod error;
pub mod game_mechanics;
pub mod patterns;
pub mod scoring;
pub mod server;
pub mod simulation;
pub mod solver;
pub mod types;

pub use error::OracleError;
pub use types::{Board, OracleContext, ScoreBreakdown};
