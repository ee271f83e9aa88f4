//! # Store Errors
//!
//! Error types for the persistence gateway and the identifier codec.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Malformed external identifier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
}

/// Persistence gateway errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A unique index rejected the write
    #[error("duplicate key on field '{field}'")]
    DuplicateKey { field: String },

    /// A stored document could not be decoded into the requested record
    #[error("document decode failed: {0}")]
    Decode(String),

    /// A record could not be encoded as a document
    #[error("document encode failed: {0}")]
    Encode(String),

    /// The backing store is unreachable or refused the operation
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Whether the failure is a uniqueness violation
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, StoreError::DuplicateKey { .. })
    }
}
