use thiserror::Error;

/// Structure-level failures returned to the caller.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// A required part of the payload (`dataStr`, `shape`, ...) is absent.
    #[error("Missing structure: {0}")]
    MissingStructure(&'static str),
    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a single record was skipped. Never escapes [`crate::decode`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("Expected at least {expected} fields, found {found}")]
    TooFewFields { expected: usize, found: usize },
    #[error("Field {index} is not a number: {value:?}")]
    NotANumber { index: usize, value: String },
    #[error("Point list has {0} points, need at least 2")]
    TooFewPoints(usize),
}
