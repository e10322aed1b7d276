//! Construction options and their validation.

use std::time::Duration;

use fred::prelude::*;
use mutex_strategy_core::config::{LockDefaults, ReleaseMode, StrategyConfig};
use mutex_strategy_core::error::{LockError, LockResult};
use serde::{Deserialize, Serialize};

/// Server used when no connection string is configured.
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Connection settings, nested under `strategyOptions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RedisConnectionOptions {
    /// `redis://[user:pass@]host[:port][/db]`.
    pub redis_connection_string: Option<String>,
}

/// Options accepted when constructing a [`RedisLockStrategy`](crate::RedisLockStrategy).
///
/// Every field is optional. Unknown fields and mistyped values are rejected;
/// nothing is coerced.
///
/// ```json
/// {
///   "strategyOptions": { "redisConnectionString": "redis://localhost:6379" },
///   "defaultMaxWaitMs": 5000,
///   "defaultLockDurationMs": 10000,
///   "releaseMode": "compareAndDelete",
///   "instanceId": "web-1"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RedisStrategyOptions {
    pub strategy_options: Option<RedisConnectionOptions>,
    pub default_max_wait_ms: Option<u64>,
    pub default_lock_duration_ms: Option<u64>,
    pub release_mode: Option<ReleaseMode>,
    pub instance_id: Option<String>,
}

/// Options that passed validation, ready to build a client and a strategy.
#[derive(Debug, Clone)]
pub struct ValidatedOptions {
    pub redis: RedisConfig,
    pub strategy: StrategyConfig,
}

impl RedisStrategyOptions {
    /// Parses options from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::Configuration`] describing the offending field.
    pub fn from_json(json: &str) -> LockResult<Self> {
        serde_json::from_str(json).map_err(|e| LockError::Configuration(e.to_string()))
    }

    /// Returns the configured connection string, if any.
    pub fn connection_string(&self) -> Option<&str> {
        self.strategy_options
            .as_ref()
            .and_then(|opts| opts.redis_connection_string.as_deref())
    }

    /// Checks every field, producing the client and strategy configuration.
    pub fn validate(&self) -> LockResult<ValidatedOptions> {
        let url = self.connection_string().unwrap_or(DEFAULT_REDIS_URL);
        let redis = RedisConfig::from_url(url).map_err(|e| {
            LockError::Configuration(format!(
                "\"strategyOptions.redisConnectionString\" is not a valid Redis URL: {e}"
            ))
        })?;

        let strategy = StrategyConfig {
            instance_id: self.instance_id.clone(),
            defaults: LockDefaults {
                max_wait: self
                    .default_max_wait_ms
                    .map_or(LockDefaults::MAX_WAIT, Duration::from_millis),
                lock_duration: self
                    .default_lock_duration_ms
                    .map_or(LockDefaults::LOCK_DURATION, Duration::from_millis),
            },
            release_mode: self.release_mode.unwrap_or_default(),
        };
        strategy.validate()?;

        Ok(ValidatedOptions { redis, strategy })
    }
}
