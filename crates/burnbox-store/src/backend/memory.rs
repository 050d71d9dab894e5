//! In-process backend with a background expiry sweeper

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use async_trait::async_trait;
use tokio::task::AbortHandle;
use tracing::debug;

use super::{Backend, BackendError};
use crate::{clock::Clock, secret::Secret};

/// In-process backend: a mutexed map plus a periodic sweeper task.
///
/// The map has no native expiry; the `ttl` arguments are ignored and
/// eviction reads `expires` from the record itself. A sweeper scans on a
/// fixed interval and drops entries whose expiry has passed; between sweeps,
/// expired entries are hidden by the policy layer's lazy expiry check.
///
/// Dropping the backend aborts the sweeper; [`MemoryBackend::shutdown`] does
/// the same deterministically.
pub struct MemoryBackend {
    secrets: Arc<Mutex<HashMap<String, Secret>>>,
    sweeper: Option<AbortHandle>,
}

impl MemoryBackend {
    /// Backend without a sweeper: expired entries are only ever hidden
    /// lazily, never evicted. Intended for tests and short-lived processes.
    pub fn new() -> Self {
        Self { secrets: Arc::new(Mutex::new(HashMap::new())), sweeper: None }
    }

    /// Backend whose sweeper evicts expired entries every `interval`. A zero
    /// `interval` is clamped up to one millisecond.
    ///
    /// The sweeper reads time from `clock`, so a simulated clock drives
    /// eviction in tests. Must be called from within a Tokio runtime.
    pub fn with_sweeper(interval: Duration, clock: Arc<dyn Clock>) -> Self {
        // tokio's interval timer panics on a zero period
        let interval = interval.max(Duration::from_millis(1));
        let secrets: Arc<Mutex<HashMap<String, Secret>>> = Arc::default();

        let map = Arc::clone(&secrets);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately; skip it so a fresh
            // backend does not sweep before anything is stored.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                sweep(&map, clock.as_ref());
            }
        });

        Self { secrets, sweeper: Some(task.abort_handle()) }
    }

    /// Stop the sweeper. Stored secrets stay readable, but expired entries
    /// are no longer physically evicted, only hidden by lazy expiry checks.
    pub fn shutdown(&self) {
        if let Some(sweeper) = &self.sweeper {
            sweeper.abort();
        }
    }

    /// Number of physically stored entries, including expired ones the
    /// sweeper has not reached yet.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no entries are physically stored.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Secret>> {
        // A poisoned lock only means another holder panicked; every write
        // leaves the map in a consistent state, so keep going.
        self.secrets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MemoryBackend {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn sweep(map: &Mutex<HashMap<String, Secret>>, clock: &dyn Clock) {
    let now = clock.now_utc();

    let mut secrets = map.lock().unwrap_or_else(PoisonError::into_inner);
    let before = secrets.len();
    secrets.retain(|_, secret| !secret.is_expired(now));
    let evicted = before - secrets.len();

    if evicted > 0 {
        debug!(evicted, "swept expired secrets");
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn put(&self, key: &str, secret: &Secret, _ttl: Duration) -> Result<(), BackendError> {
        self.lock().insert(key.to_string(), secret.clone());
        Ok(())
    }

    async fn update(
        &self,
        key: &str,
        secret: &Secret,
        _ttl: Duration,
    ) -> Result<bool, BackendError> {
        match self.lock().get_mut(key) {
            Some(slot) => {
                *slot = secret.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn get(&self, key: &str) -> Result<Option<Secret>, BackendError> {
        Ok(self.lock().get(key).cloned())
    }

    async fn take(&self, key: &str) -> Result<Option<Secret>, BackendError> {
        Ok(self.lock().remove(key))
    }

    async fn delete(&self, key: &str) -> Result<(), BackendError> {
        self.lock().remove(key);
        Ok(())
    }
}
