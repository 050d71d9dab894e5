//! Crypto error types.

use thiserror::Error;

/// Errors from opening a sealed message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Authentication or decoding failed.
    ///
    /// Coarse by contract: a wrong passphrase and a tampered ciphertext are
    /// indistinguishable to the caller. The reason string is for logs only.
    #[error("decryption failed: {reason}")]
    DecryptionFailed {
        /// Failure cause for logging, never shown to end users
        reason: String,
    },
}
