//! TTL map implementing the store primitives.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use mutex_strategy_core::error::LockResult;
use mutex_strategy_core::store::LockStore;
use tokio::time::Instant;

#[derive(Debug)]
struct Entry {
    value: String,
    /// `None` when the TTL reaches past what the clock can represent.
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

/// A shared in-memory key-value store with expiring entries.
///
/// Expired entries are treated as absent and purged lazily on access.
#[derive(Debug, Clone, Default)]
pub struct MemoryLockStore {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
}

impl MemoryLockStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        // Every critical section leaves the map consistent, so a poisoned
        // guard is still usable.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the live value under `key`, if any.
    pub fn peek(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        self.entries()
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone())
    }

    /// Returns the remaining lifetime of the entry under `key`.
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        self.entries()
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.expires_at.map_or(Duration::MAX, |at| at - now))
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries();
        entries.retain(|_, entry| entry.is_live(now));
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LockStore for MemoryLockStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> LockResult<bool> {
        let now = Instant::now();
        let mut entries = self.entries();
        if entries.get(key).is_some_and(|entry| entry.is_live(now)) {
            return Ok(false);
        }
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: now.checked_add(ttl),
            },
        );
        Ok(true)
    }

    async fn get(&self, key: &str) -> LockResult<Option<String>> {
        Ok(self.peek(key))
    }

    async fn delete(&self, key: &str) -> LockResult<()> {
        self.entries().remove(key);
        Ok(())
    }

    async fn delete_if_equals(&self, key: &str, value: &str) -> LockResult<bool> {
        let now = Instant::now();
        let mut entries = self.entries();
        let owned = entries
            .get(key)
            .is_some_and(|entry| entry.is_live(now) && entry.value == value);
        if owned {
            entries.remove(key);
        }
        Ok(owned)
    }

    /// No connection to release. Other strategies sharing this store keep
    /// their entries.
    async fn close(&self) -> LockResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn conditional_set_respects_live_entries() {
        let store = MemoryLockStore::new();

        assert!(store.set_if_absent("k", "a", Duration::from_secs(1)).await.unwrap());
        assert!(!store.set_if_absent("k", "b", Duration::from_secs(1)).await.unwrap());
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("a"));
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let store = MemoryLockStore::new();
        store.set_if_absent("k", "a", Duration::from_millis(100)).await.unwrap();

        tokio::time::advance(Duration::from_millis(99)).await;
        assert_eq!(store.peek("k").as_deref(), Some("a"));

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(store.peek("k").is_none());
        assert!(store.set_if_absent("k", "b", Duration::from_millis(100)).await.unwrap());
        assert_eq!(store.peek("k").as_deref(), Some("b"));
    }

    #[tokio::test(start_paused = true)]
    async fn unrepresentable_ttl_never_expires() {
        let store = MemoryLockStore::new();

        assert!(store.set_if_absent("k", "a", Duration::MAX).await.unwrap());
        assert_eq!(store.ttl("k"), Some(Duration::MAX));

        tokio::time::advance(Duration::from_secs(86_400 * 365)).await;
        assert_eq!(store.peek("k").as_deref(), Some("a"));
        assert!(!store.set_if_absent("k", "b", Duration::from_secs(1)).await.unwrap());
        assert!(store.delete_if_equals("k", "a").await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn delete_if_equals_ignores_other_values() {
        let store = MemoryLockStore::new();
        store.set_if_absent("k", "a", Duration::from_secs(1)).await.unwrap();

        assert!(!store.delete_if_equals("k", "b").await.unwrap());
        assert_eq!(store.peek("k").as_deref(), Some("a"));
        assert!(store.delete_if_equals("k", "a").await.unwrap());
        assert!(store.is_empty());
        assert!(!store.delete_if_equals("k", "a").await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn clones_share_entries() {
        let store = MemoryLockStore::new();
        let other = store.clone();
        store.set_if_absent("k", "a", Duration::from_secs(1)).await.unwrap();

        assert_eq!(other.peek("k").as_deref(), Some("a"));
        assert_eq!(other.ttl("k"), Some(Duration::from_secs(1)));
        other.close().await.unwrap();
        assert_eq!(store.len(), 1);
    }
}
