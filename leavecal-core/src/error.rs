//! Error types for leavecal.

use thiserror::Error;

/// Errors that can occur in leavecal operations.
///
/// Malformed calendar input is never reported through this type; extractors
/// degrade to partial results instead (see [`crate::extract::Extraction`]).
#[derive(Error, Debug)]
pub enum LeaveCalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,

    #[error("Model API returned {status}: {message}")]
    ModelApi { status: u16, message: String },

    #[error("Model returned no recommendation")]
    EmptyResponse,
}

/// Result type alias for leavecal operations.
pub type LeaveCalResult<T> = Result<T, LeaveCalError>;
