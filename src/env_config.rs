//! Shared environment configuration for the bingo binaries.
//!
//! Consolidates the `BINGO_NUM_THREADS`, `BINGO_SEED`, `BINGO_CONFIG` and
//! `BINGO_PORT` reads.

use std::path::Path;

use crate::config::ScoringConfig;
use crate::error::OracleError;
use crate::types::OracleContext;

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_PORT: u16 = 8080;

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.trim().parse().ok())
}

/// Read `BINGO_NUM_THREADS` (fallback `RAYON_NUM_THREADS`, default available
/// parallelism).
pub fn worker_threads() -> usize {
    parsed_var::<usize>("BINGO_NUM_THREADS")
        .or_else(|| parsed_var("RAYON_NUM_THREADS"))
        .filter(|&n| n > 0)
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
}

/// Read `BINGO_SEED` (default 42).
pub fn seed() -> u64 {
    parsed_var("BINGO_SEED").unwrap_or(DEFAULT_SEED)
}

/// Read `BINGO_PORT` (default 8080).
pub fn server_port() -> u16 {
    parsed_var("BINGO_PORT").unwrap_or(DEFAULT_PORT)
}

/// Load a JSON scoring config. Missing fields take their defaults.
pub fn load_config(path: &Path) -> Result<ScoringConfig, OracleError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        OracleError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
    })?;
    ScoringConfig::from_json_str(&text)
}

/// Context from `path`, else from `BINGO_CONFIG`, else the defaults.
pub fn load_context(path: Option<&Path>) -> Result<OracleContext, OracleError> {
    let from_env = std::env::var_os("BINGO_CONFIG").map(std::path::PathBuf::from);
    match path.or(from_env.as_deref()) {
        Some(p) => {
            log::info!("loading scoring config from {}", p.display());
            OracleContext::new(load_config(p)?)
        }
        None => Ok(OracleContext::default()),
    }
}
