use thiserror::Error;

#[derive(Error, Debug)]
pub enum PmplError {
    #[error("Solver diverged at iteration {iteration}: {message}")]
    SolverDiverged { iteration: usize, message: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Trajectory of particle {index} has {found} points, expected {expected}")]
    TrajectoryLength {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("Parse error in {path} at line {line}: {message}")]
    Parse {
        path: String,
        line: usize,
        message: String,
    },

    #[error("Plot error: {0}")]
    Plot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type PmplResult<T> = Result<T, PmplError>;
