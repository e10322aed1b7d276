//! Redis backend for mutex strategies.

pub mod options;
pub mod store;
pub mod strategy;

pub use options::{DEFAULT_REDIS_URL, RedisConnectionOptions, RedisStrategyOptions};
pub use store::RedisLockStore;
pub use strategy::{RedisLockStrategy, RedisLockStrategyBuilder};
