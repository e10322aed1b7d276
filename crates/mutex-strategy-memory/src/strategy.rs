//! In-process lock strategy.

use mutex_strategy_core::config::StrategyConfig;
use mutex_strategy_core::engine::StoreLockStrategy;
use mutex_strategy_core::error::LockResult;
use mutex_strategy_core::request::{AcquireOptions, AcquisitionResult};
use mutex_strategy_core::token::OwnershipToken;
use mutex_strategy_core::traits::LockStrategy;

use crate::store::MemoryLockStore;

/// A lock strategy over a [`MemoryLockStore`].
///
/// Only excludes holders that share the same store, which makes it useful for
/// single-process deployments and for exercising strategy-agnostic code in tests.
pub struct MemoryLockStrategy {
    inner: StoreLockStrategy<MemoryLockStore>,
}

impl MemoryLockStrategy {
    /// Creates a strategy with default settings.
    pub fn new(store: MemoryLockStore) -> Self {
        Self {
            inner: StoreLockStrategy::with_default_config(store),
        }
    }

    /// Creates a strategy with explicit settings.
    pub fn with_config(store: MemoryLockStore, config: StrategyConfig) -> LockResult<Self> {
        Ok(Self {
            inner: StoreLockStrategy::new(store, config)?,
        })
    }

    /// Returns the backing store.
    pub fn store(&self) -> &MemoryLockStore {
        self.inner.store()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }
}

impl Default for MemoryLockStrategy {
    fn default() -> Self {
        Self::new(MemoryLockStore::new())
    }
}

impl LockStrategy for MemoryLockStrategy {
    fn instance_id(&self) -> &str {
        self.inner.instance_id()
    }

    async fn acquire(&self, key: &str, options: AcquireOptions) -> LockResult<AcquisitionResult> {
        self.inner.acquire(key, options).await
    }

    async fn release(&self, key: &str, token: &OwnershipToken) -> LockResult<()> {
        self.inner.release(key, token).await
    }

    async fn close(&self) -> LockResult<()> {
        self.inner.close().await
    }
}
