//! Semantic-map error types

use thiserror::Error;

/// Errors fatal to an entire annotation run.
///
/// Per-variable problems (missing predicate, malformed reconstruction step,
/// conflicting shared label) are *not* errors at this level; they are carried
/// as [`crate::resolve::ResolveOutcome::Invalid`] so sibling variables keep
/// running.
#[derive(Debug, Error)]
pub enum MapError {
    /// The document is not valid JSON or lacks the required top-level shape
    #[error("invalid semantic map: {0}")]
    Input(String),

    /// JSON syntax error while parsing the document
    #[error("semantic map is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for semantic-map operations
pub type MapResult<T> = Result<T, MapError>;
