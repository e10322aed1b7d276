//! Request and result types passed across the strategy interface.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::token::OwnershipToken;

/// What a [`LockRequest`] asks the strategy to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LockMode {
    Acquire,
    Release,
}

/// Per-call overrides for an acquisition.
///
/// Unset fields fall back to the strategy's [`LockDefaults`](crate::config::LockDefaults).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcquireOptions {
    /// How long to keep polling before giving up.
    pub max_wait: Option<Duration>,
    /// TTL attached to the lock entry once written.
    pub lock_duration: Option<Duration>,
}

impl AcquireOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }

    pub fn lock_duration(mut self, lock_duration: Duration) -> Self {
        self.lock_duration = Some(lock_duration);
        self
    }
}

/// A single call into a strategy, with the mode carried explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockRequest {
    pub key: String,
    pub mode: LockMode,
    /// Required for [`LockMode::Release`]; ignored on acquire, which always
    /// generates a fresh token.
    pub ownership_token: Option<OwnershipToken>,
    pub options: AcquireOptions,
}

impl LockRequest {
    /// Builds an acquire request.
    pub fn acquire(key: impl Into<String>, options: AcquireOptions) -> Self {
        Self {
            key: key.into(),
            mode: LockMode::Acquire,
            ownership_token: None,
            options,
        }
    }

    /// Builds a release request for a previously returned token.
    pub fn release(key: impl Into<String>, token: OwnershipToken) -> Self {
        Self {
            key: key.into(),
            mode: LockMode::Release,
            ownership_token: Some(token),
            options: AcquireOptions::default(),
        }
    }
}

/// Returned by a successful acquisition.
///
/// Keep it: the token is the only way to release the lock later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquisitionResult {
    pub key: String,
    pub ownership_token: OwnershipToken,
}
