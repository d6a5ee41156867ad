//! Store and execution errors

use thiserror::Error;

/// Errors from the SPARQL store transport.
///
/// These are execution errors in the run taxonomy: fatal to the variable
/// whose operation failed, never to sibling variables.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed store response: {0}")]
    Malformed(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
