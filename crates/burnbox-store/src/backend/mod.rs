//! Storage backends for secrets
//!
//! Trait-based abstraction over the persistence primitives the store policy
//! needs. Implementations are shared as `Arc<dyn Backend>`; which one backs
//! a store is decided once, at construction.

mod error;
mod memory;
mod redis;

use std::time::Duration;

use async_trait::async_trait;

pub use error::BackendError;
pub use memory::MemoryBackend;

pub use self::redis::RedisBackend;

use crate::secret::Secret;

/// Persistence primitives for secrets.
///
/// Implementations must make `take` atomic with respect to concurrent
/// `take`/`delete` on the same key: one stored secret is observed by at most
/// one taker.
///
/// The TTL bounds physical retention only. Logical expiry is enforced above
/// the backend, so an implementation may keep an expired record around until
/// its own eviction mechanism fires.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Store `secret` under `key`, overwriting, retained for at most `ttl`.
    async fn put(&self, key: &str, secret: &Secret, ttl: Duration) -> Result<(), BackendError>;

    /// Store `secret` under `key` only if the key is still present; reports
    /// whether the write happened.
    ///
    /// Keeps bookkeeping writes from resurrecting a concurrently consumed or
    /// evicted secret.
    async fn update(&self, key: &str, secret: &Secret, ttl: Duration)
    -> Result<bool, BackendError>;

    /// Fetch the secret under `key` without consuming it.
    async fn get(&self, key: &str) -> Result<Option<Secret>, BackendError>;

    /// Atomically fetch and delete the secret under `key`.
    async fn take(&self, key: &str) -> Result<Option<Secret>, BackendError>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), BackendError>;
}
