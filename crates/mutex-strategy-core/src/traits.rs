//! The mutual-exclusion interface implemented by every strategy.

use std::future::Future;

use crate::error::{LockError, LockResult};
use crate::request::{AcquireOptions, AcquisitionResult, LockMode, LockRequest};
use crate::token::OwnershipToken;

// ============================================================================
// Strategy Trait
// ============================================================================

/// A pluggable backend for distributed mutual exclusion.
///
/// Provides exclusive access to a resource identified by `key` across
/// processes and machines. The backend (Redis, in-process map, ...) decides
/// where lock entries live.
///
/// # Example
///
/// ```rust,ignore
/// use mutex_strategy_core::prelude::*;
///
/// async fn migrate(strategy: &impl LockStrategy) -> LockResult<()> {
///     let lock = strategy
///         .acquire("job:migrate", AcquireOptions::new().max_wait(Duration::from_secs(2)))
///         .await?;
///
///     run_migrations().await;
///
///     strategy.release(&lock.key, &lock.ownership_token).await
/// }
/// ```
pub trait LockStrategy: Send + Sync {
    /// Returns the identifier embedded in every token this instance hands out.
    fn instance_id(&self) -> &str;

    /// Acquires the lock on `key`, polling until `options.max_wait` elapses.
    ///
    /// # Returns
    ///
    /// * `Ok(result)` - Lock acquired; keep `result.ownership_token` to release it
    /// * `Err(LockError::Timeout)` - The wait budget ran out
    /// * `Err(LockError::AcquisitionFailure)` - The loop stopped on a non-store fault
    /// * `Err(LockError::InvalidRequest)` - Empty key or zero lock duration
    ///
    /// # Cancellation
    ///
    /// The wait budget is the only cancellation mechanism. Dropping the
    /// future between attempts leaves no state behind.
    fn acquire(
        &self,
        key: &str,
        options: AcquireOptions,
    ) -> impl Future<Output = LockResult<AcquisitionResult>> + Send;

    /// Releases `key` if it is still held with `token`.
    ///
    /// A lock held by someone else, or no lock at all, is a normal outcome and
    /// returns `Ok(())` without touching the store. Store faults propagate.
    fn release(
        &self,
        key: &str,
        token: &OwnershipToken,
    ) -> impl Future<Output = LockResult<()>> + Send;

    /// Releases the store connection.
    ///
    /// Idempotent. Completes once the connection has been shut down, so
    /// shutdown sequences can await it.
    fn close(&self) -> impl Future<Output = LockResult<()>> + Send;
}

// ============================================================================
// Convenience Extensions
// ============================================================================

/// Extension trait providing convenience methods for strategies.
pub trait LockStrategyExt: LockStrategy {
    /// Runs a [`LockRequest`], dispatching on its mode.
    ///
    /// Acquire requests return `Some(result)`; release requests return `None`.
    fn execute(
        &self,
        request: LockRequest,
    ) -> impl Future<Output = LockResult<Option<AcquisitionResult>>> + Send
    where
        Self: Sync,
    {
        async move {
            match request.mode {
                LockMode::Acquire => self
                    .acquire(&request.key, request.options)
                    .await
                    .map(Some),
                LockMode::Release => {
                    let token = request.ownership_token.ok_or_else(|| {
                        LockError::InvalidRequest(format!(
                            "release of {:?} requires an ownership token",
                            request.key
                        ))
                    })?;
                    self.release(&request.key, &token).await?;
                    Ok(None)
                }
            }
        }
    }

    /// Acquires `key`, runs `critical_section`, then releases the lock.
    ///
    /// The lock is released whether or not the section fails. The section's
    /// error wins over a release error.
    fn with_lock<F, Fut, T, E>(
        &self,
        key: &str,
        options: AcquireOptions,
        critical_section: F,
    ) -> impl Future<Output = Result<T, E>> + Send
    where
        Self: Sync,
        F: FnOnce(AcquisitionResult) -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
        T: Send,
        E: From<LockError> + Send,
    {
        async move {
            let lock = self.acquire(key, options).await?;
            let token = lock.ownership_token.clone();
            let outcome = critical_section(lock).await;
            let released = self.release(key, &token).await;
            let value = outcome?;
            released?;
            Ok(value)
        }
    }
}

// Blanket implementation for all strategies
impl<T: LockStrategy> LockStrategyExt for T {}
