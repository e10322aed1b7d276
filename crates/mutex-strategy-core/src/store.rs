//! Store client adapter contract.

use std::future::Future;
use std::time::Duration;

use crate::error::LockResult;

/// The primitive operations a key-value store must offer to back a lock.
///
/// Every method maps to one store round trip. Connectivity and protocol
/// faults are reported as [`LockError::Store`](crate::error::LockError::Store)
/// so the engine can tell them apart from other failures.
pub trait LockStore: Send + Sync {
    /// Short backend name used in log fields.
    fn backend(&self) -> &'static str;

    /// `SET key value NX PX ttl`: writes only when `key` is absent.
    ///
    /// Returns `true` if the write happened, `false` if the key already existed.
    fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> impl Future<Output = LockResult<bool>> + Send;

    /// `GET key`.
    fn get(&self, key: &str) -> impl Future<Output = LockResult<Option<String>>> + Send;

    /// `DEL key`. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> impl Future<Output = LockResult<()>> + Send;

    /// Deletes `key` only if it currently holds `value`, as one atomic operation.
    ///
    /// Returns `true` if the key was deleted.
    fn delete_if_equals(
        &self,
        key: &str,
        value: &str,
    ) -> impl Future<Output = LockResult<bool>> + Send;

    /// Releases the store connection.
    fn close(&self) -> impl Future<Output = LockResult<()>> + Send;
}
