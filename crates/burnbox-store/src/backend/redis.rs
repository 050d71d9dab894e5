//! Redis backend delegating expiry to per-key TTLs

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use tracing::debug;

use super::{Backend, BackendError};
use crate::secret::Secret;

/// Redis-backed store: secrets are JSON payloads under namespaced keys with
/// native TTLs, so no sweeper runs. Consuming reads use `GETDEL`;
/// bookkeeping updates use `SET XX` and cannot resurrect a consumed key.
#[derive(Clone)]
pub struct RedisBackend {
    connection: ConnectionManager,
    namespace: String,
}

impl RedisBackend {
    /// Connect to `url` (for example `redis://127.0.0.1/`), prefixing every
    /// key with `namespace` to keep clear of unrelated data in the same
    /// database.
    ///
    /// The managed connection reconnects by itself after a drop; operations
    /// issued while it is down return `BackendError::Unavailable`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Unavailable` when the initial connection
    /// cannot be established.
    pub async fn connect(url: &str, namespace: &str) -> Result<Self, BackendError> {
        let client = redis::Client::open(url)?;
        let connection = client.get_connection_manager().await?;

        Ok(Self { connection, namespace: namespace.to_string() })
    }
}

/// Prefixed key isolating this store's data.
fn namespaced(namespace: &str, key: &str) -> String {
    format!("{namespace}:{key}")
}

/// TTL in whole seconds for `SET EX`, clamped up to at least 1.
fn ttl_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

fn decode(key: &str, payload: Option<String>) -> Result<Option<Secret>, BackendError> {
    match payload {
        Some(payload) => {
            debug!(key, "loaded secret");
            Ok(Some(serde_json::from_str(&payload)?))
        }
        None => {
            debug!(key, "secret not found");
            Ok(None)
        }
    }
}

#[async_trait]
impl Backend for RedisBackend {
    async fn put(&self, key: &str, secret: &Secret, ttl: Duration) -> Result<(), BackendError> {
        let payload = serde_json::to_string(secret)?;
        let mut connection = self.connection.clone();

        debug!(key, expires = %secret.expires, "storing secret");
        let () = redis::cmd("SET")
            .arg(namespaced(&self.namespace, key))
            .arg(payload)
            .arg("EX")
            .arg(ttl_seconds(ttl))
            .query_async(&mut connection)
            .await?;

        Ok(())
    }

    async fn update(
        &self,
        key: &str,
        secret: &Secret,
        ttl: Duration,
    ) -> Result<bool, BackendError> {
        let payload = serde_json::to_string(secret)?;
        let mut connection = self.connection.clone();

        let applied: Option<String> = redis::cmd("SET")
            .arg(namespaced(&self.namespace, key))
            .arg(payload)
            .arg("EX")
            .arg(ttl_seconds(ttl))
            .arg("XX")
            .query_async(&mut connection)
            .await?;

        Ok(applied.is_some())
    }

    async fn get(&self, key: &str) -> Result<Option<Secret>, BackendError> {
        let mut connection = self.connection.clone();

        let payload: Option<String> = redis::cmd("GET")
            .arg(namespaced(&self.namespace, key))
            .query_async(&mut connection)
            .await?;

        decode(key, payload)
    }

    async fn take(&self, key: &str) -> Result<Option<Secret>, BackendError> {
        let mut connection = self.connection.clone();

        let payload: Option<String> = redis::cmd("GETDEL")
            .arg(namespaced(&self.namespace, key))
            .query_async(&mut connection)
            .await?;

        decode(key, payload)
    }

    async fn delete(&self, key: &str) -> Result<(), BackendError> {
        let mut connection = self.connection.clone();

        debug!(key, "removing secret");
        let () = redis::cmd("DEL")
            .arg(namespaced(&self.namespace, key))
            .query_async(&mut connection)
            .await?;

        Ok(())
    }
}
