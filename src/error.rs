// src/error.rs
// Standardized error types for MediOps

use thiserror::Error;

/// Main error type for the MediOps library
#[derive(Error, Debug)]
pub enum MediOpsError {
    #[error("GEMINI_API_KEY is not configured")]
    MissingApiKey,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("empty response: {0}")]
    EmptyResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Result using MediOpsError
pub type Result<T> = std::result::Result<T, MediOpsError>;

impl From<String> for MediOpsError {
    fn from(s: String) -> Self {
        MediOpsError::Other(s)
    }
}
