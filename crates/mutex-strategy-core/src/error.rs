//! Error types for mutex strategy operations.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during lock operations.
#[derive(Error, Debug)]
pub enum LockError {
    /// Construction options failed validation. No strategy was created.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A single call was malformed (empty key, zero lock duration, missing token).
    #[error("invalid lock request: {0}")]
    InvalidRequest(String),

    /// Lock acquisition timed out.
    #[error("timed out before acquiring the lock (waited {0:?})")]
    Timeout(Duration),

    /// The acquisition loop stopped on a fault other than a store error.
    #[error("could not acquire lock: {0}")]
    AcquisitionFailure(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The backing store reported a connectivity or protocol fault.
    #[error("store operation failed: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The strategy was closed and no longer owns a store connection.
    #[error("lock strategy is closed")]
    Closed,
}

impl LockError {
    /// Wraps a store client error.
    pub fn store(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Store(Box::new(err))
    }

    /// Returns `true` for errors the acquisition loop absorbs and retries.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

/// Result type for lock operations.
pub type LockResult<T> = Result<T, LockError>;
