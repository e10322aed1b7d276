//! Strategy configuration shared by every store-backed backend.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LockError, LockResult};

/// How a release removes the lock entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReleaseMode {
    /// Read the entry, then delete it if it holds our token.
    ///
    /// Two separate store operations. If the entry expires and is re-acquired
    /// by another holder between the read and the delete, that holder's entry
    /// is removed.
    #[default]
    ReadThenDelete,
    /// Compare and delete in one atomic store operation.
    CompareAndDelete,
}

/// Per-call values used when an acquire does not override them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockDefaults {
    /// How long an acquire keeps polling.
    pub max_wait: Duration,
    /// TTL attached to a freshly written lock entry.
    pub lock_duration: Duration,
}

impl LockDefaults {
    /// Default polling budget.
    pub const MAX_WAIT: Duration = Duration::from_secs(5);
    /// Default lock entry TTL.
    pub const LOCK_DURATION: Duration = Duration::from_secs(10);
}

impl Default for LockDefaults {
    fn default() -> Self {
        Self {
            max_wait: Self::MAX_WAIT,
            lock_duration: Self::LOCK_DURATION,
        }
    }
}

/// Backend-independent strategy settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrategyConfig {
    /// Stable identifier embedded in every ownership token. Random when unset.
    pub instance_id: Option<String>,
    pub defaults: LockDefaults,
    pub release_mode: ReleaseMode,
}

impl StrategyConfig {
    /// Checks the settings, returning a [`LockError::Configuration`] naming
    /// the first offending field.
    pub fn validate(&self) -> LockResult<()> {
        if let Some(id) = &self.instance_id {
            if id.is_empty() {
                return Err(LockError::Configuration(
                    "\"instanceId\" must not be empty".to_string(),
                ));
            }
            if id.chars().any(char::is_whitespace) {
                return Err(LockError::Configuration(format!(
                    "\"instanceId\" must not contain whitespace (got {id:?})"
                )));
            }
        }
        if self.defaults.max_wait.is_zero() {
            return Err(LockError::Configuration(
                "\"defaultMaxWaitMs\" must be greater than 0".to_string(),
            ));
        }
        if self.defaults.lock_duration.as_millis() == 0 {
            return Err(LockError::Configuration(
                "\"defaultLockDurationMs\" must be at least 1 millisecond".to_string(),
            ));
        }
        Ok(())
    }
}
