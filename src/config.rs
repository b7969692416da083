//! Server settings read from the environment.

use std::env;
use std::time::Duration;

use crate::db::PoolOptions;
use crate::services::feature_flags::StaticFeatureFlags;

/// Settings the binary needs at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub address: String,
    pub port: u16,
    pub busy_timeout: Duration,
    pub pool_timeout: Duration,
    /// Raw comma-separated list of enabled feature flags.
    pub feature_flags: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: Self::DEFAULT_DATABASE_URL.to_string(),
            address: Self::DEFAULT_ADDRESS.to_string(),
            port: Self::DEFAULT_PORT,
            busy_timeout: Duration::from_millis(Self::DEFAULT_BUSY_TIMEOUT_MS),
            pool_timeout: Duration::from_secs(Self::DEFAULT_POOL_TIMEOUT_SECS),
            feature_flags: String::new(),
        }
    }
}

impl ServerConfig {
    const DEFAULT_DATABASE_URL: &'static str = "app.db";
    const DEFAULT_ADDRESS: &'static str = "127.0.0.1";
    const DEFAULT_PORT: u16 = 8080;
    const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
    const DEFAULT_POOL_TIMEOUT_SECS: u64 = 30;

    /// Read the configuration from process environment variables.
    ///
    /// - `DATABASE_URL` (default `app.db`)
    /// - `ADDRESS` (default `127.0.0.1`)
    /// - `PORT` (default `8080`)
    /// - `DB_BUSY_TIMEOUT_MS` (default `5000`)
    /// - `DB_POOL_TIMEOUT_SECS` (default `30`)
    /// - `FEATURE_FLAGS`, for example `workflow_price_updates`
    ///
    /// Unparsable numbers fall back to their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let number = |key: &str, default: u64| {
            lookup(key)
                .and_then(|value| value.trim().parse::<u64>().ok())
                .unwrap_or(default)
        };

        let port = lookup("PORT")
            .and_then(|value| value.trim().parse::<u16>().ok())
            .unwrap_or(Self::DEFAULT_PORT);

        Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| Self::DEFAULT_DATABASE_URL.to_string()),
            address: lookup("ADDRESS").unwrap_or_else(|| Self::DEFAULT_ADDRESS.to_string()),
            port,
            busy_timeout: Duration::from_millis(number(
                "DB_BUSY_TIMEOUT_MS",
                Self::DEFAULT_BUSY_TIMEOUT_MS,
            )),
            pool_timeout: Duration::from_secs(number(
                "DB_POOL_TIMEOUT_SECS",
                Self::DEFAULT_POOL_TIMEOUT_SECS,
            )),
            feature_flags: lookup("FEATURE_FLAGS").unwrap_or_default(),
        }
    }

    pub fn pool_options(&self) -> PoolOptions {
        PoolOptions {
            busy_timeout: self.busy_timeout,
            connection_timeout: self.pool_timeout,
            ..PoolOptions::default()
        }
    }

    pub fn feature_flags(&self) -> StaticFeatureFlags {
        StaticFeatureFlags::from_list(&self.feature_flags)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::services::feature_flags::{FeatureFlagRouter, WORKFLOW_PRICE_UPDATES_FLAG};

    fn config_from(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = config_from(&[]);

        assert_eq!(config.database_url, "app.db");
        assert_eq!(config.address, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.busy_timeout, Duration::from_millis(5_000));
        assert!(!config.feature_flags().is_feature_enabled(WORKFLOW_PRICE_UPDATES_FLAG));
    }

    #[test]
    fn reads_overrides_and_ignores_garbage_numbers() {
        let config = config_from(&[
            ("DATABASE_URL", "prices.db"),
            ("PORT", "not-a-port"),
            ("DB_BUSY_TIMEOUT_MS", "250"),
            ("DB_POOL_TIMEOUT_SECS", "2"),
            ("FEATURE_FLAGS", "workflow_price_updates"),
        ]);

        assert_eq!(config.database_url, "prices.db");
        assert_eq!(config.port, 8080);

        let options = config.pool_options();
        assert_eq!(options.busy_timeout, Duration::from_millis(250));
        assert_eq!(options.connection_timeout, Duration::from_secs(2));
        assert!(config.feature_flags().is_feature_enabled(WORKFLOW_PRICE_UPDATES_FLAG));
    }
}
