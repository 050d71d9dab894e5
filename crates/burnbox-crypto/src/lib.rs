//! Burnbox Cryptographic Primitives
//!
//! Seals short text messages under a human-supplied passphrase. Pure
//! functions with deterministic outputs. Callers provide the random IV for
//! deterministic testing.
//!
//! # Envelope
//!
//! ```text
//! Passphrase + IV (16 bytes, fresh per secret)
//!        │
//!        ▼
//! HKDF-SHA256 (IV as salt, domain label)
//!        │
//!        ▼
//! Key (32 bytes) + Nonce (24 bytes)
//!        │
//!        ▼
//! XChaCha20-Poly1305 → SealedMessage { iv, ciphertext }
//! ```
//!
//! The IV travels with the ciphertext; key and nonce are re-derived at open
//! time and zeroized after use.
//!
//! # Security
//!
//! - Authenticated encryption: a wrong passphrase or a flipped ciphertext bit
//!   fails the Poly1305 tag instead of yielding garbage plaintext
//! - Per-secret salt: the same passphrase never reuses key material across
//!   secrets, and never reuses a nonce unless the IV repeats
//! - Password digests (stored for comparison) are derived separately from
//!   key material

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod derivation;
mod envelope;
mod error;

pub use derivation::password_digest;
pub use envelope::{IV_SIZE, SealedMessage, open_message, seal_message};
pub use error::CryptoError;
