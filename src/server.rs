//! Axum HTTP server: stateless move-oracle endpoints for the browser front-end.
//!
//! Every endpoint is a pure computation against the shared `OracleContext`,
//! held as `Arc<OracleContext>` across async handlers.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/config` | Active scoring config |
//! | POST | `/evaluate` | Score breakdown of every empty cell |
//! | POST | `/optimal_move` | Best cell and its score |
//! | POST | `/suggest` | Best cell plus the best strictly lower-scoring one |
//!
//! POST bodies are `{"board": [cells]}`. Bad boards answer 400, a board with
//! no moves left answers 409.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};

use crate::constants::BOARD_CELLS;
use crate::error::OracleError;
use crate::solver::{evaluate_all, optimal_move, suggest_moves, MoveSuggestion, ScoredMove};
use crate::types::{Board, OracleContext, ScoreBreakdown};

pub type AppState = Arc<OracleContext>;

type ApiError = (StatusCode, Json<serde_json::Value>);

pub fn create_router(ctx: Arc<OracleContext>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health_check))
        .route("/config", get(handle_get_config))
        .route("/evaluate", post(handle_evaluate))
        .route("/optimal_move", post(handle_optimal_move))
        .route("/suggest", post(handle_suggest))
        .layer(cors)
        .with_state(ctx)
}

// ── Request/Response types ──────────────────────────────────────────

#[derive(Deserialize)]
struct BoardRequest {
    board: Vec<i64>,
}

fn error_response(status: StatusCode, msg: &str) -> ApiError {
    (status, Json(serde_json::json!({ "error": msg })))
}

fn oracle_error(e: OracleError) -> ApiError {
    let status = match e {
        OracleError::InvalidMove { .. }
        | OracleError::CellOutOfRange { .. }
        | OracleError::BudgetExceeded { .. } => StatusCode::BAD_REQUEST,
        OracleError::NoValidMoves => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, &e.to_string())
}

/// Board from request cells, checked against the context's budget.
fn parse_board(ctx: &OracleContext, cells: &[i64]) -> Result<Board, ApiError> {
    let mut valid = Vec::with_capacity(cells.len());
    for &c in cells {
        if !(0..BOARD_CELLS as i64).contains(&c) {
            return Err(error_response(
                StatusCode::BAD_REQUEST,
                &format!("cell {c} is outside the board"),
            ));
        }
        valid.push(c as u8);
    }
    ctx.board_from_cells(&valid).map_err(oracle_error)
}

// ── GET handlers ────────────────────────────────────────────────────

async fn handle_health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "OK" }))
}

async fn handle_get_config(State(ctx): State<AppState>) -> Json<crate::config::ScoringConfig> {
    Json(ctx.config)
}

// ── POST handlers ───────────────────────────────────────────────────

async fn handle_evaluate(
    State(ctx): State<AppState>,
    Json(req): Json<BoardRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let board = parse_board(&ctx, &req.board)?;
    let evaluations: BTreeMap<u8, ScoreBreakdown> = evaluate_all(&ctx, board)
        .map_err(oracle_error)?
        .into_iter()
        .map(|m| (m.cell, m.score))
        .collect();
    Ok(Json(serde_json::json!({ "evaluations": evaluations })))
}

async fn handle_optimal_move(
    State(ctx): State<AppState>,
    Json(req): Json<BoardRequest>,
) -> Result<Json<ScoredMove>, ApiError> {
    let board = parse_board(&ctx, &req.board)?;
    optimal_move(&ctx, board).map(Json).map_err(oracle_error)
}

async fn handle_suggest(
    State(ctx): State<AppState>,
    Json(req): Json<BoardRequest>,
) -> Result<Json<MoveSuggestion>, ApiError> {
    let board = parse_board(&ctx, &req.board)?;
    suggest_moves(&ctx, board).map(Json).map_err(oracle_error)
}
