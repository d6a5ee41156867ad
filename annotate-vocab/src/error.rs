//! Vocabulary error types

use thiserror::Error;

/// Errors raised while validating compact IRIs against the prefix table
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VocabError {
    /// The value is not a syntactically valid `prefix:local` identifier
    #[error("invalid compact IRI `{0}`: {1}")]
    InvalidCurie(String, String),

    /// The compact IRI uses a prefix the table does not declare
    #[error("unknown prefix `{0}` in `{1}`")]
    UnknownPrefix(String, String),
}

/// Result type for vocabulary operations
pub type VocabResult<T> = Result<T, VocabError>;
