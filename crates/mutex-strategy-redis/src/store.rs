//! Redis store adapter.

use std::time::Duration;

use fred::prelude::*;
use fred::types::CustomCommand;
use mutex_strategy_core::error::{LockError, LockResult};
use mutex_strategy_core::store::LockStore;
use tokio::task::JoinHandle;
use tracing::warn;

/// Lock store speaking to a single Redis server through a `fred` client.
///
/// The client is owned for the store's lifetime: it is connected when the
/// store is created and shut down with `QUIT` on [`close`](LockStore::close).
pub struct RedisLockStore {
    client: RedisClient,
    /// Logs errors the client reports outside of any command.
    error_listener: JoinHandle<Result<(), RedisError>>,
    /// Connection task, present when this store started the connection.
    connection: Option<JoinHandle<Result<(), RedisError>>>,
}

impl RedisLockStore {
    /// Lua script deleting the key only if it holds the given token.
    const RELEASE_SCRIPT_LUA: &'static str = r#"
        if redis.call('get', KEYS[1]) == ARGV[1] then
            return redis.call('del', KEYS[1])
        end
        return 0
    "#;

    /// Creates a client for `config` and starts connecting in the background.
    ///
    /// Commands issued before the connection is up are queued by the client.
    /// Must be called inside a tokio runtime.
    pub fn connect(config: RedisConfig) -> Self {
        let policy = ReconnectPolicy::new_exponential(0, 100, 30_000, 2);
        let client = RedisClient::new(config, None, None, Some(policy));
        let error_listener = Self::listen_for_errors(&client);
        let connection = client.connect();

        Self {
            client,
            error_listener,
            connection: Some(connection),
        }
    }

    /// Wraps an existing client. The caller is responsible for connecting it.
    pub fn from_client(client: RedisClient) -> Self {
        let error_listener = Self::listen_for_errors(&client);
        Self {
            client,
            error_listener,
            connection: None,
        }
    }

    fn listen_for_errors(client: &RedisClient) -> JoinHandle<Result<(), RedisError>> {
        client.on_error(|error| {
            warn!(backend = "redis", error = %error, "redis client error");
            Ok(())
        })
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &RedisClient {
        &self.client
    }

    /// Waits for the next connection attempt to finish.
    pub async fn wait_for_connect(&self) -> LockResult<()> {
        self.client.wait_for_connect().await.map_err(|e| {
            LockError::Store(Box::new(std::io::Error::other(format!(
                "failed to connect to Redis: {}",
                e
            ))))
        })
    }
}

impl LockStore for RedisLockStore {
    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> LockResult<bool> {
        let expiry_millis = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);

        // SET NX returns Some("OK") if the key was set, None if it already exists
        let result: Option<String> = self
            .client
            .set(
                key,
                value,
                Some(Expiration::PX(expiry_millis)),
                Some(SetOptions::NX),
                false,
            )
            .await
            .map_err(LockError::store)?;

        Ok(result.is_some())
    }

    async fn get(&self, key: &str) -> LockResult<Option<String>> {
        self.client.get(key).await.map_err(LockError::store)
    }

    async fn delete(&self, key: &str) -> LockResult<()> {
        let _: i64 = self.client.del(key).await.map_err(LockError::store)?;
        Ok(())
    }

    async fn delete_if_equals(&self, key: &str, value: &str) -> LockResult<bool> {
        let args: Vec<RedisValue> = vec![
            Self::RELEASE_SCRIPT_LUA.into(),
            1_i64.into(), // numkeys
            key.to_string().into(),
            value.to_string().into(),
        ];

        let cmd = CustomCommand::new_static("EVAL", None, false);
        let deleted: i64 = self
            .client
            .custom(cmd, args)
            .await
            .map_err(LockError::store)?;

        Ok(deleted == 1)
    }

    async fn close(&self) -> LockResult<()> {
        let result = self.client.quit().await.map_err(LockError::store);
        self.error_listener.abort();
        if let Some(connection) = &self.connection {
            connection.abort();
        }
        result
    }
}

impl Drop for RedisLockStore {
    fn drop(&mut self) {
        // Listener tasks hold a client clone; stop them so they don't outlive us.
        self.error_listener.abort();
    }
}
