//! Error types for the Harbor mutation engine.
//!
//! Only recoverable conditions live here (malformed inputs handed in by
//! the host). Invariant violations - a mutation applied to the wrong
//! document, transform results that do not line up with their transforms -
//! are caller bugs and panic instead; see the `mutation` module docs.

use thiserror::Error;

/// All possible errors from the Harbor mutation engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid field path: {0}")]
    InvalidFieldPath(String),

    #[error("document data must be a JSON object, got {0}")]
    NotAnObject(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
