use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClaimcheckError>;

/// Failures of the CLI surface. The audit engine itself never returns these:
/// per-file problems degrade to recorded skips, so only reading inputs and
/// writing exports can fail a run.
#[derive(Error, Debug)]
pub enum ClaimcheckError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not a directory: {0}")]
    NotADirectory(String),
}
