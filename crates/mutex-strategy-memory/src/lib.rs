//! In-process backend for mutex strategies.
//!
//! Lock entries live in a shared map with per-entry expiry. Clones of a
//! [`MemoryLockStore`] share the same map, so several strategies built from
//! one store behave like independent processes talking to one server.

pub mod store;
pub mod strategy;

pub use store::MemoryLockStore;
pub use strategy::MemoryLockStrategy;
