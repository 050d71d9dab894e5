//! Store error types.

use thiserror::Error;

use crate::backend::BackendError;

/// Errors from store operations.
///
/// Absence is not an error: a missing, expired, consumed or undecryptable
/// secret reads as `Ok(None)` so callers cannot tell those cases apart.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Caller input rejected before the backend was touched.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What was wrong with the input
        reason: String,
    },

    /// The backend failed; distinct from an absent secret.
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
}
