//! Core traits, types and the store-backed engine for mutex strategies.
//!
//! A strategy lets independent processes agree, through a shared key-value
//! store, that at most one of them holds a named lock at a time. Backends
//! plug in a [`LockStore`](store::LockStore) and reuse
//! [`StoreLockStrategy`](engine::StoreLockStrategy) for the acquisition loop
//! and the ownership-checked release.

pub mod backoff;
pub mod config;
pub mod engine;
pub mod error;
pub mod prelude;
pub mod request;
pub mod store;
pub mod token;
pub mod traits;

pub use error::{LockError, LockResult};
pub use prelude::*;
