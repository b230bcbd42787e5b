//! Error taxonomy shared by the oracle, the environment and the harness.

#[derive(thiserror::Error, Debug)]
pub enum OracleError {
    /// Attempt to occupy a cell that is already occupied.
    #[error("invalid move: cell {cell} is already occupied")]
    InvalidMove { cell: u8 },
    #[error("cell {cell} is outside the 5x5 board")]
    CellOutOfRange { cell: u8 },
    /// More occupied cells than the configured budget allows.
    #[error("board has {cells} cells, the budget is {budget}")]
    BudgetExceeded { cells: usize, budget: usize },
    /// Optimal move requested on a board with no playable cell left.
    #[error("no valid moves: the cell budget is used up")]
    NoValidMoves,
    /// The cell budget is below the smallest union of any `arity`-subset of lines.
    #[error("no {arity}-line combination fits a budget of {budget} cells")]
    EnumerationInfeasible { arity: usize, budget: usize },
    #[error("invalid scoring config: {0}")]
    InvalidConfig(String),
    #[error("config parse error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
