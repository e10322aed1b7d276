//! Store-backed lock engine.
//!
//! Turns a non-blocking conditional write into a best-effort blocking lock:
//! poll `SET NX` until it succeeds or the wait budget runs out, sleeping a
//! random 150–300 ms between attempts. Store faults during acquisition are
//! treated like contention and retried; an attempt that is still pending when
//! the budget runs out is abandoned. Release reads the entry and deletes it
//! only when it still carries the caller's token.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::OnceCell;
use tokio::time::Instant;
use tracing::{Span, debug, field, instrument};

use crate::backoff;
use crate::config::{LockDefaults, ReleaseMode, StrategyConfig};
use crate::error::{LockError, LockResult};
use crate::request::{AcquireOptions, AcquisitionResult};
use crate::store::LockStore;
use crate::token::{OwnershipToken, TokenGenerator};
use crate::traits::LockStrategy;

/// A lock strategy driving any [`LockStore`].
///
/// Owns the store for its whole lifetime; [`close`](LockStrategy::close)
/// shuts the store down.
pub struct StoreLockStrategy<S> {
    store: S,
    tokens: TokenGenerator,
    defaults: LockDefaults,
    release_mode: ReleaseMode,
    /// Set as soon as `close` starts; operations check it.
    closing: AtomicBool,
    /// Completed once the store has been closed.
    closed: OnceCell<()>,
}

impl<S: LockStore> StoreLockStrategy<S> {
    /// Creates a strategy over `store` after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::Configuration`] if `config` is invalid.
    pub fn new(store: S, config: StrategyConfig) -> LockResult<Self> {
        config.validate()?;
        Ok(Self::from_validated(store, config))
    }

    /// Creates a strategy over `store` with the default settings and a random
    /// instance id.
    pub fn with_default_config(store: S) -> Self {
        Self::from_validated(store, StrategyConfig::default())
    }

    fn from_validated(store: S, config: StrategyConfig) -> Self {
        let tokens = match config.instance_id {
            Some(id) => TokenGenerator::new(id),
            None => TokenGenerator::random(),
        };

        Self {
            store,
            tokens,
            defaults: config.defaults,
            release_mode: config.release_mode,
            closing: AtomicBool::new(false),
            closed: OnceCell::new(),
        }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the defaults applied to acquire calls.
    pub fn defaults(&self) -> LockDefaults {
        self.defaults
    }

    /// Returns how releases remove lock entries.
    pub fn release_mode(&self) -> ReleaseMode {
        self.release_mode
    }

    /// Returns `true` once `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.closing.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> LockResult<()> {
        if self.is_closed() {
            Err(LockError::Closed)
        } else {
            Ok(())
        }
    }

    /// Resolves per-call overrides against the defaults and checks them.
    fn resolve(&self, key: &str, options: &AcquireOptions) -> LockResult<(Duration, Duration)> {
        if key.is_empty() {
            return Err(LockError::InvalidRequest("lock key must not be empty".to_string()));
        }

        let max_wait = options.max_wait.unwrap_or(self.defaults.max_wait);
        let lock_duration = options.lock_duration.unwrap_or(self.defaults.lock_duration);
        if lock_duration.as_millis() == 0 {
            return Err(LockError::InvalidRequest(format!(
                "lock duration must be at least 1ms (got {lock_duration:?})"
            )));
        }

        Ok((max_wait, lock_duration))
    }
}

impl<S: LockStore> LockStrategy for StoreLockStrategy<S> {
    fn instance_id(&self) -> &str {
        self.tokens.instance_id()
    }

    #[instrument(
        skip(self, key, options),
        fields(
            lock.key = %key,
            backend = self.store.backend(),
            max_wait_ms = field::Empty,
            attempts = field::Empty,
            acquired = field::Empty,
            elapsed_ms = field::Empty,
        )
    )]
    async fn acquire(&self, key: &str, options: AcquireOptions) -> LockResult<AcquisitionResult> {
        self.ensure_open()?;
        let (max_wait, lock_duration) = self.resolve(key, &options)?;
        let span = Span::current();
        span.record("max_wait_ms", millis(max_wait));

        let token = self.tokens.generate();
        let started = Instant::now();
        let mut attempts: u32 = 0;

        loop {
            let remaining = max_wait.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                break;
            }
            if self.is_closed() {
                return Err(LockError::AcquisitionFailure(Box::new(LockError::Closed)));
            }

            attempts += 1;
            // The attempt itself is bounded by what is left of the budget; a
            // store that never answers must not outlive the deadline.
            let attempt = self
                .store
                .set_if_absent(key, token.as_str(), lock_duration);
            match tokio::time::timeout(remaining, attempt).await {
                Ok(Ok(true)) => {
                    span.record("attempts", attempts);
                    span.record("acquired", true);
                    span.record("elapsed_ms", millis(started.elapsed()));
                    debug!("lock acquired");
                    return Ok(AcquisitionResult {
                        key: key.to_string(),
                        ownership_token: token,
                    });
                }
                Ok(Ok(false)) => {
                    debug!(attempt = attempts, "lock is held elsewhere, backing off");
                }
                Ok(Err(err)) if err.is_transient() => {
                    debug!(attempt = attempts, error = %err, "store fault while acquiring, backing off");
                }
                Ok(Err(err)) => {
                    span.record("attempts", attempts);
                    span.record("acquired", false);
                    return Err(LockError::AcquisitionFailure(Box::new(err)));
                }
                Err(_) => {
                    debug!(attempt = attempts, "store did not answer before the deadline");
                    break;
                }
            }

            tokio::time::sleep(backoff::jitter()).await;
        }

        span.record("attempts", attempts);
        span.record("acquired", false);
        span.record("elapsed_ms", millis(started.elapsed()));
        debug!("timed out before acquiring the lock");
        Err(LockError::Timeout(max_wait))
    }

    #[instrument(
        skip(self, key, token),
        fields(
            lock.key = %key,
            backend = self.store.backend(),
            release_mode = ?self.release_mode,
            released = field::Empty,
        )
    )]
    async fn release(&self, key: &str, token: &OwnershipToken) -> LockResult<()> {
        self.ensure_open()?;

        let released = match self.release_mode {
            ReleaseMode::ReadThenDelete => {
                let current = self.store.get(key).await?;
                if current.as_deref() == Some(token.as_str()) {
                    self.store.delete(key).await?;
                    true
                } else {
                    false
                }
            }
            ReleaseMode::CompareAndDelete => {
                self.store.delete_if_equals(key, token.as_str()).await?
            }
        };

        Span::current().record("released", released);
        if !released {
            debug!("lock not held with this token, nothing to release");
        }
        Ok(())
    }

    #[instrument(skip(self), fields(backend = self.store.backend()))]
    async fn close(&self) -> LockResult<()> {
        self.closing.store(true, Ordering::Release);
        self.closed
            .get_or_try_init(|| async {
                self.store.close().await?;
                debug!("store connection closed");
                Ok::<(), LockError>(())
            })
            .await?;
        Ok(())
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
