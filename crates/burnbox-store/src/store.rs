//! Store policy: saving, revealing and password checking
//!
//! Implemented once against the backend primitives, so both backends get
//! identical attempt-limiting, expiry and default-password behavior.

use std::sync::Arc;

use burnbox_crypto::{IV_SIZE, open_message, password_digest, seal_message};
use chrono::{DateTime, Utc};
use rand::RngCore;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    backend::{Backend, MemoryBackend, RedisBackend},
    clock::{Clock, SystemClock},
    config::StoreConfig,
    error::StoreError,
    secret::Secret,
    token,
};

/// Outcome of a password check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordCheck {
    /// The stored hint, reported only during a live password challenge
    pub note: Option<String>,
    /// Whether the caller may proceed to the consuming read
    pub success: bool,
    /// Wrong guesses left before the secret burns
    pub remaining_attempts: u32,
}

/// The secret store: policy over an interchangeable backend.
///
/// Cheap to clone; clones share the backend, the default password and the
/// attempt gate. The default password is fixed at construction and never
/// regenerates, since secrets sealed under it would otherwise become
/// permanently unreadable.
#[derive(Clone)]
pub struct SecretStore {
    backend: Arc<dyn Backend>,
    clock: Arc<dyn Clock>,
    default_password: Arc<str>,
    max_attempts: u32,
    attempt_gate: Arc<Mutex<()>>,
}

impl SecretStore {
    /// Open a store per `config`: a configured Redis URL selects the Redis
    /// backend, anything else keeps secrets in process memory with a
    /// background sweeper.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` when the Redis connection cannot be
    /// established.
    pub async fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let backend: Arc<dyn Backend> = match &config.redis_url {
            Some(url) => {
                let backend = RedisBackend::connect(url, &config.namespace).await?;
                info!(namespace = %config.namespace, "using Redis secret store");
                Arc::new(backend)
            }
            None => {
                warn!("Redis URL not set, using in-memory secret store");
                Arc::new(MemoryBackend::with_sweeper(config.sweep_interval, Arc::clone(&clock)))
            }
        };

        Ok(Self::with_backend(backend, config, clock))
    }

    /// Store over an explicit backend and clock. Any sweeper is the
    /// backend's to manage.
    pub fn with_backend(
        backend: Arc<dyn Backend>,
        config: &StoreConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let default_password = config
            .default_password
            .clone()
            .unwrap_or_else(|| token::random_token(token::DEFAULT_PASSWORD_LENGTH));

        Self {
            backend,
            clock,
            default_password: default_password.into(),
            max_attempts: config.max_attempts.max(1),
            attempt_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Wrong-password budget per secret.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Encrypt and persist a secret under `key`.
    ///
    /// A non-empty `password` gates the secret and becomes its passphrase;
    /// otherwise the store's default password seals it and reading it back
    /// requires no password. An empty password string counts as no password.
    ///
    /// # Errors
    ///
    /// - `InvalidInput`: empty key, or `expires` not in the future
    /// - `Backend`: persistence failed
    pub async fn save(
        &self,
        key: &str,
        note: &str,
        message: &str,
        expires: DateTime<Utc>,
        password: Option<&str>,
    ) -> Result<(), StoreError> {
        if key.is_empty() {
            return Err(StoreError::InvalidInput { reason: "key must not be empty".to_string() });
        }

        let now = self.clock.now_utc();
        let ttl = (expires - now)
            .to_std()
            .ok()
            .filter(|ttl| !ttl.is_zero())
            .ok_or_else(|| StoreError::InvalidInput {
                reason: format!("expiry {expires} is not in the future"),
            })?;

        let supplied = password.filter(|password| !password.is_empty());
        let passphrase = supplied.unwrap_or(self.default_password.as_ref());

        let mut iv = [0u8; IV_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut iv);

        let secret = Secret {
            note: note.to_string(),
            message: seal_message(passphrase, message, iv),
            expires,
            password_protected: supplied.is_some(),
            password_hash: supplied.map(password_digest),
            password_attempts: 0,
        };

        debug!(key, %expires, protected = secret.password_protected, "storing secret");
        self.backend.put(key, &secret, ttl).await?;

        Ok(())
    }

    /// Fetch the secret under `key`; with `remove` set, the fetch also
    /// deletes it atomically.
    ///
    /// Expired records read as `None` even before the backend evicts them,
    /// covering backend TTL granularity and clock skew; a consuming load
    /// still deletes the expired record it hides.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` when the backend fails. Absence is
    /// `Ok(None)`, never an error.
    pub async fn load(&self, key: &str, remove: bool) -> Result<Option<Secret>, StoreError> {
        let secret = if remove {
            self.backend.take(key).await?
        } else {
            self.backend.get(key).await?
        };

        let now = self.clock.now_utc();
        Ok(secret.filter(|secret| !secret.is_expired(now)))
    }

    /// Reveal and consume the message under `key`.
    ///
    /// The record is removed whenever it is found, even when decryption then
    /// fails; a failed decryption reads as `None`, indistinguishable from an
    /// absent key. At most one concurrent caller can receive the message.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` when the backend fails.
    pub async fn get_message(
        &self,
        key: &str,
        password: Option<&str>,
    ) -> Result<Option<String>, StoreError> {
        let Some(secret) = self.load(key, true).await? else {
            return Ok(None);
        };

        let passphrase = if secret.password_protected {
            password.unwrap_or("")
        } else {
            self.default_password.as_ref()
        };

        match open_message(&secret.message, passphrase) {
            Ok(message) => Ok(Some(message)),
            Err(error) => {
                warn!(key, %error, "failed to decrypt secret, discarding");
                Ok(None)
            }
        }
    }

    /// Whether the secret under `key` requires a password. Read-only; does
    /// not consume. Absent and expired secrets read as unprotected.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` when the backend fails.
    pub async fn is_password_protected(&self, key: &str) -> Result<bool, StoreError> {
        let secret = self.load(key, false).await?;

        Ok(secret.is_some_and(|secret| secret.password_protected))
    }

    /// Check a password guess against the secret under `key`.
    ///
    /// Success means the caller may proceed to the consuming read; nothing
    /// is deleted or mutated on that path. A wrong guess increments the
    /// attempt count and persists it with the record's TTL intact; the final
    /// allowed wrong guess burns the secret outright, after which even the
    /// correct password finds nothing.
    ///
    /// Absent, expired and unprotected secrets all report success with zero
    /// remaining attempts and no note; the caller learns which case it was
    /// only from the consuming read.
    ///
    /// Guesses are serialized through an internal gate so concurrent wrong
    /// answers cannot exceed the attempt budget.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` when the backend fails.
    pub async fn check_password(
        &self,
        key: &str,
        password: &str,
    ) -> Result<PasswordCheck, StoreError> {
        let _gate = self.attempt_gate.lock().await;

        let Some(mut secret) = self.load(key, false).await? else {
            return Ok(PasswordCheck { note: None, success: true, remaining_attempts: 0 });
        };

        if !secret.password_protected {
            return Ok(PasswordCheck { note: None, success: true, remaining_attempts: 0 });
        }

        if secret.password_hash.as_deref() == Some(password_digest(password).as_str()) {
            return Ok(PasswordCheck {
                note: Some(secret.note),
                success: true,
                remaining_attempts: 0,
            });
        }

        secret.password_attempts += 1;
        let remaining_attempts = self.max_attempts.saturating_sub(secret.password_attempts);

        if remaining_attempts == 0 {
            warn!(key, attempts = secret.password_attempts, "attempts exhausted, burning secret");
            self.backend.delete(key).await?;
        } else {
            let ttl = (secret.expires - self.clock.now_utc()).to_std().unwrap_or_default();
            // Only-if-present write: a concurrently consumed or evicted
            // record must stay gone.
            self.backend.update(key, &secret, ttl).await?;
        }

        Ok(PasswordCheck { note: Some(secret.note), success: false, remaining_attempts })
    }
}
