//! Store configuration
//!
//! Environment-driven settings with builder-style overrides. Every knob has
//! a working default; an empty environment yields an in-memory store.

use std::time::Duration;

/// Settings for [`crate::SecretStore`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Redis connection URL; `None` selects the in-memory backend
    pub redis_url: Option<String>,
    /// Prefix for backend keys, isolating this store's data
    pub namespace: String,
    /// Wrong-password budget per secret before it burns
    pub max_attempts: u32,
    /// Passphrase for secrets saved without a password; generated fresh at
    /// store construction when `None`
    pub default_password: Option<String>,
    /// Cadence of the in-memory backend's expiry sweeper
    pub sweep_interval: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            namespace: "burnbox".to_string(),
            max_attempts: 3,
            default_password: None,
            sweep_interval: Duration::from_secs(60),
        }
    }
}

impl StoreConfig {
    /// Read configuration from `BURNBOX_*` environment variables, keeping
    /// defaults for anything unset or unparsable.
    ///
    /// - `BURNBOX_REDIS_URL` selects the Redis backend
    /// - `BURNBOX_NAMESPACE`: backend key prefix (default `burnbox`)
    /// - `BURNBOX_MAX_ATTEMPTS`: wrong-password budget (default 3)
    /// - `BURNBOX_DEFAULT_PASSWORD` pins the default password instead of
    ///   generating one per process; secrets saved without a password
    ///   survive restarts only when this is set
    /// - `BURNBOX_SWEEP_INTERVAL_SECS`: in-memory sweeper cadence
    ///   (default 60)
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from a key lookup, defaults filling every miss or parse failure.
    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let max_attempts = var("BURNBOX_MAX_ATTEMPTS")
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.max_attempts);

        let sweep_interval = var("BURNBOX_SWEEP_INTERVAL_SECS")
            .and_then(|value| value.parse().ok())
            .map_or(defaults.sweep_interval, Duration::from_secs);

        Self {
            redis_url: var("BURNBOX_REDIS_URL"),
            namespace: var("BURNBOX_NAMESPACE").unwrap_or(defaults.namespace),
            max_attempts,
            default_password: var("BURNBOX_DEFAULT_PASSWORD"),
            sweep_interval,
        }
    }

    /// Use the Redis backend at `url`.
    #[must_use]
    pub fn with_redis_url(mut self, url: impl Into<String>) -> Self {
        self.redis_url = Some(url.into());
        self
    }

    /// Override the backend key namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Override the wrong-password budget.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Pin the default password instead of generating one per process.
    #[must_use]
    pub fn with_default_password(mut self, password: impl Into<String>) -> Self {
        self.default_password = Some(password.into());
        self
    }

    /// Override the in-memory sweeper cadence.
    #[must_use]
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_select_the_in_memory_backend() {
        let config = StoreConfig::default();

        assert_eq!(config.redis_url, None);
        assert_eq!(config.namespace, "burnbox");
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.default_password, None);
        assert_eq!(config.sweep_interval, Duration::from_secs(60));
    }

    #[test]
    fn builders_override_fields() {
        let config = StoreConfig::default()
            .with_redis_url("redis://127.0.0.1/")
            .with_namespace("staging")
            .with_max_attempts(5)
            .with_default_password("pinned")
            .with_sweep_interval(Duration::from_secs(5));

        assert_eq!(config.redis_url.as_deref(), Some("redis://127.0.0.1/"));
        assert_eq!(config.namespace, "staging");
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.default_password.as_deref(), Some("pinned"));
        assert_eq!(config.sweep_interval, Duration::from_secs(5));
    }

    #[test]
    fn empty_environment_keeps_the_defaults() {
        let config = StoreConfig::from_vars(|_| None);

        assert_eq!(config.redis_url, None);
        assert_eq!(config.namespace, "burnbox");
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.default_password, None);
        assert_eq!(config.sweep_interval, Duration::from_secs(60));
    }

    #[test]
    fn environment_values_override_the_defaults() {
        let config = StoreConfig::from_vars(|key| {
            let value = match key {
                "BURNBOX_REDIS_URL" => "redis://127.0.0.1/",
                "BURNBOX_NAMESPACE" => "staging",
                "BURNBOX_MAX_ATTEMPTS" => "5",
                "BURNBOX_DEFAULT_PASSWORD" => "pinned",
                "BURNBOX_SWEEP_INTERVAL_SECS" => "5",
                _ => return None,
            };
            Some(value.to_string())
        });

        assert_eq!(config.redis_url.as_deref(), Some("redis://127.0.0.1/"));
        assert_eq!(config.namespace, "staging");
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.default_password.as_deref(), Some("pinned"));
        assert_eq!(config.sweep_interval, Duration::from_secs(5));
    }

    #[test]
    fn unparsable_environment_values_fall_back_to_defaults() {
        let config = StoreConfig::from_vars(|key| match key {
            "BURNBOX_MAX_ATTEMPTS" => Some("not-a-number".to_string()),
            "BURNBOX_SWEEP_INTERVAL_SECS" => Some("ten".to_string()),
            _ => None,
        });

        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.sweep_interval, Duration::from_secs(60));
    }
}
