//! Backend error types.
//!
//! - `Unavailable`: the backend could not be reached or failed an operation
//! - `Serialization`: a stored payload failed to encode or decode

use thiserror::Error;

/// Errors from backend primitives.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Backend unreachable or the connection failed mid-operation.
    ///
    /// Distinct from an absent key by contract: connectivity trouble must
    /// never read as "secret doesn't exist".
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// A stored payload failed to encode or decode.
    #[error("payload serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Serialization(err.to_string())
    }
}

impl From<redis::RedisError> for BackendError {
    fn from(err: redis::RedisError) -> Self {
        BackendError::Unavailable(err.to_string())
    }
}
