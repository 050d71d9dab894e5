//! Burnbox Secret Store
//!
//! Ephemeral storage for self-destructing secrets: a short message is sealed
//! under an optional password and lives until its expiry or its single
//! successful read, whichever comes first. Wrong-password guessing burns it.
//!
//! # Architecture
//!
//! ```text
//! SecretStore (policy)
//!   ├─ save / load / get_message
//!   ├─ is_password_protected / check_password
//!   │    (attempt limiting, default password, lazy expiry)
//!   └─ Backend (primitives: put / update / get / take / delete)
//!       ├─ MemoryBackend (map + background sweeper)
//!       └─ RedisBackend (native per-key TTL, GETDEL)
//! ```
//!
//! # Lifecycle
//!
//! A secret is created exactly once, mutated only by wrong-password
//! bookkeeping, and ends absent: consumed by a read, evicted at expiry or
//! burned when the attempt budget runs out. Consuming reads are
//! at-most-once; concurrent readers race for a single winner.
//!
//! The store reports "never existed", "expired", "already read" and "failed
//! to decrypt" identically as an absent secret. Backend connectivity
//! failures stay distinct errors and are never folded into absence.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod backend;
mod clock;
mod config;
mod error;
mod secret;
mod store;
pub mod token;

pub use backend::{Backend, BackendError, MemoryBackend, RedisBackend};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::StoreConfig;
pub use error::StoreError;
pub use secret::Secret;
pub use store::{PasswordCheck, SecretStore};
