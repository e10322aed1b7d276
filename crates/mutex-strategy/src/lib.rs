//! Distributed mutual exclusion with pluggable store-backed strategies.
//!
//! A strategy lets several processes agree, through a shared key-value store,
//! that at most one of them holds a named lock at a time. Typical use: run a
//! migration exactly once when N replicas boot together.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mutex_strategy::*;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let strategy = RedisLockStrategy::builder()
//!         .connection_string("redis://localhost:6379")
//!         .build()?;
//!
//!     let options = AcquireOptions::new()
//!         .max_wait(Duration::from_secs(2))
//!         .lock_duration(Duration::from_secs(5));
//!
//!     // Keep the token: it is the only way to release the lock.
//!     let lock = strategy.acquire("job:migrate", options).await?;
//!     println!("Running migrations...");
//!     strategy.release(&lock.key, &lock.ownership_token).await?;
//!
//!     strategy.close().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Strategies
//!
//! ## Redis
//!
//! `SET key token NX PX ttl` with randomized 150–300 ms backoff, and a release
//! that deletes the key only when it still holds the caller's token.
//!
//! ```rust,no_run
//! use mutex_strategy::{RedisLockStrategy, RedisStrategyOptions};
//!
//! let options = RedisStrategyOptions::from_json(
//!     r#"{ "strategyOptions": { "redisConnectionString": "redis://localhost:6379" } }"#,
//! )?;
//! let strategy = RedisLockStrategy::from_options(options)?;
//! # Ok::<(), mutex_strategy::LockError>(())
//! ```
//!
//! ## In-memory
//!
//! Same engine over a process-local TTL map. Strategies sharing one
//! [`MemoryLockStore`] exclude each other.
//!
//! ```rust,no_run
//! use mutex_strategy::{MemoryLockStore, MemoryLockStrategy};
//!
//! let store = MemoryLockStore::new();
//! let a = MemoryLockStrategy::new(store.clone());
//! let b = MemoryLockStrategy::new(store);
//! ```
//!
//! # Crates
//!
//! Everything below is reachable from this crate's root:
//! - `mutex-strategy-core`: the `LockStrategy` trait, `LockStore` primitives,
//!   the polling engine and error types
//! - `mutex-strategy-redis`: `RedisLockStrategy` and its options schema
//! - `mutex-strategy-memory`: `MemoryLockStrategy` over a shared TTL map
//!
//! Libraries that only need the trait can depend on `mutex-strategy-core`.

pub use mutex_strategy_core::*;

// Both backends name their modules `store` and `strategy`; the root-level
// type re-exports are unambiguous.
#[allow(ambiguous_glob_reexports)]
pub use mutex_strategy_memory::*;
#[allow(ambiguous_glob_reexports)]
pub use mutex_strategy_redis::*;
