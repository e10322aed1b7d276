//! Redis lock strategy and its builder.

use std::time::Duration;

use fred::prelude::*;
use mutex_strategy_core::config::ReleaseMode;
use mutex_strategy_core::engine::StoreLockStrategy;
use mutex_strategy_core::error::{LockError, LockResult};
use mutex_strategy_core::request::{AcquireOptions, AcquisitionResult};
use mutex_strategy_core::token::OwnershipToken;
use mutex_strategy_core::traits::LockStrategy;

use crate::options::{RedisConnectionOptions, RedisStrategyOptions};
use crate::store::RedisLockStore;

/// Builder for Redis lock strategy configuration.
#[derive(Default)]
pub struct RedisLockStrategyBuilder {
    options: RedisStrategyOptions,
    client: Option<RedisClient>,
}

impl RedisLockStrategyBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a full set of options, e.g. parsed with
    /// [`RedisStrategyOptions::from_json`].
    pub fn options(mut self, options: RedisStrategyOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the Redis server URL. Defaults to the local standard instance.
    pub fn connection_string(mut self, url: impl Into<String>) -> Self {
        self.options.strategy_options = Some(RedisConnectionOptions {
            redis_connection_string: Some(url.into()),
        });
        self
    }

    /// Uses an existing Redis client instead of creating one.
    ///
    /// The strategy takes ownership and quits the client on close.
    pub fn client(mut self, client: RedisClient) -> Self {
        self.client = Some(client);
        self
    }

    /// Sets how long acquires poll when the call does not say.
    pub fn default_max_wait(mut self, max_wait: Duration) -> Self {
        self.options.default_max_wait_ms = Some(saturating_millis(max_wait));
        self
    }

    /// Sets the lock entry TTL used when the call does not say.
    pub fn default_lock_duration(mut self, lock_duration: Duration) -> Self {
        self.options.default_lock_duration_ms = Some(saturating_millis(lock_duration));
        self
    }

    /// Sets how releases remove the lock entry.
    pub fn release_mode(mut self, mode: ReleaseMode) -> Self {
        self.options.release_mode = Some(mode);
        self
    }

    /// Sets the identifier embedded in ownership tokens.
    pub fn instance_id(mut self, id: impl Into<String>) -> Self {
        self.options.instance_id = Some(id.into());
        self
    }

    /// Validates the options and builds the strategy.
    ///
    /// Validation happens before any client is created, so a bad option never
    /// leaves a connection behind. The connection itself is established in the
    /// background; see [`RedisLockStrategy::wait_for_connect`].
    ///
    /// Must be called inside a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::Configuration`] if any option is invalid.
    pub fn build(self) -> LockResult<RedisLockStrategy> {
        let validated = self.options.validate()?;

        let store = match self.client {
            Some(client) => RedisLockStore::from_client(client),
            None => RedisLockStore::connect(validated.redis),
        };

        Ok(RedisLockStrategy {
            inner: StoreLockStrategy::new(store, validated.strategy)?,
        })
    }
}

fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// A lock strategy backed by a single Redis server.
///
/// Acquires with `SET key token NX PX lockDuration`, polling with a random
/// 150–300 ms backoff until the call's wait budget runs out. Releases delete
/// the key only if it still holds the caller's token.
pub struct RedisLockStrategy {
    inner: StoreLockStrategy<RedisLockStore>,
}

impl RedisLockStrategy {
    /// Returns a new builder for configuring the strategy.
    pub fn builder() -> RedisLockStrategyBuilder {
        RedisLockStrategyBuilder::new()
    }

    /// Creates a strategy for `url` and waits for the connection.
    pub async fn new(url: impl Into<String>) -> LockResult<Self> {
        let strategy = Self::builder().connection_string(url).build()?;
        strategy.wait_for_connect().await?;
        Ok(strategy)
    }

    /// Builds a strategy from options, without waiting for the connection.
    pub fn from_options(options: RedisStrategyOptions) -> LockResult<Self> {
        Self::builder().options(options).build()
    }

    /// Waits for the next connection attempt to finish.
    pub async fn wait_for_connect(&self) -> LockResult<()> {
        if self.inner.is_closed() {
            return Err(LockError::Closed);
        }
        self.inner.store().wait_for_connect().await
    }

    /// Returns the underlying Redis client.
    pub fn client(&self) -> &RedisClient {
        self.inner.store().client()
    }

    /// Returns the store adapter, for direct `GET`/`DEL` access.
    pub fn store(&self) -> &RedisLockStore {
        self.inner.store()
    }

    pub fn release_mode(&self) -> ReleaseMode {
        self.inner.release_mode()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }
}

impl LockStrategy for RedisLockStrategy {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn invalid_url_fails_before_connecting() {
        let result = RedisLockStrategy::builder()
            .connection_string("http://[::1")
            .build();
        assert!(matches!(result, Err(LockError::Configuration(_))));
    }

    #[tokio::test]
    async fn sub_millisecond_default_duration_is_rejected() {
        let result = RedisLockStrategy::builder()
            .default_lock_duration(Duration::from_micros(10))
            .build();
        assert!(matches!(result, Err(LockError::Configuration(_))));
    }

    #[tokio::test]
    async fn oversized_default_durations_saturate() {
        let strategy = RedisLockStrategy::builder()
            .default_max_wait(Duration::MAX)
            .default_lock_duration(Duration::MAX)
            .build()
            .unwrap();
        let defaults = strategy.inner.defaults();
        assert_eq!(defaults.max_wait, Duration::from_millis(u64::MAX));
        assert_eq!(defaults.lock_duration, Duration::from_millis(u64::MAX));
    }

    #[tokio::test]
    async fn instance_id_flows_into_strategy() {
        // Builds against the default local URL; no command is sent.
        let strategy = RedisLockStrategy::builder()
            .instance_id("web-1")
            .release_mode(ReleaseMode::CompareAndDelete)
            .build()
            .unwrap();
        assert_eq!(strategy.instance_id(), "web-1");
        assert_eq!(strategy.release_mode(), ReleaseMode::CompareAndDelete);
    }
}
