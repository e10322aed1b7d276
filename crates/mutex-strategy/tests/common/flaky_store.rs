//! Fault-injecting store for exercising the engine's error paths.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use mutex_strategy::{LockError, LockResult, LockStore, MemoryLockStore};

/// Wraps a [`MemoryLockStore`], failing or stalling a configurable number of
/// calls before letting them through.
#[derive(Clone, Default)]
pub struct FlakyStore {
    inner: MemoryLockStore,
    failing_sets: Arc<AtomicUsize>,
    failing_reads: Arc<AtomicUsize>,
    stalling_sets: Arc<AtomicUsize>,
    set_calls: Arc<AtomicUsize>,
}

impl FlakyStore {
    pub fn new(inner: MemoryLockStore) -> Self {
        Self {
            inner,
            ..Default::default()
        }
    }

    /// Fails the next `n` conditional sets.
    pub fn fail_next_sets(&self, n: usize) {
        self.failing_sets.store(n, Ordering::SeqCst);
    }

    /// Makes the next `n` conditional sets hang without ever answering.
    pub fn stall_next_sets(&self, n: usize) {
        self.stalling_sets.store(n, Ordering::SeqCst);
    }

    /// Fails the next `n` reads.
    pub fn fail_next_reads(&self, n: usize) {
        self.failing_reads.store(n, Ordering::SeqCst);
    }

    pub fn set_calls(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &MemoryLockStore {
        &self.inner
    }

    fn take_failure(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    fn fault(op: &str) -> LockError {
        LockError::store(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            format!("{op}: connection reset by peer"),
        ))
    }
}

impl LockStore for FlakyStore {
    fn backend(&self) -> &'static str {
        "flaky"
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> LockResult<bool> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        if Self::take_failure(&self.stalling_sets) {
            return std::future::pending().await;
        }
        if Self::take_failure(&self.failing_sets) {
            return Err(Self::fault("SET"));
        }
        self.inner.set_if_absent(key, value, ttl).await
    }

    async fn get(&self, key: &str) -> LockResult<Option<String>> {
        if Self::take_failure(&self.failing_reads) {
            return Err(Self::fault("GET"));
        }
        self.inner.get(key).await
    }

    async fn delete(&self, key: &str) -> LockResult<()> {
        self.inner.delete(key).await
    }

    async fn delete_if_equals(&self, key: &str, value: &str) -> LockResult<bool> {
        self.inner.delete_if_equals(key, value).await
    }

    async fn close(&self) -> LockResult<()> {
        self.inner.close().await
    }
}
