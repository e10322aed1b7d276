//! Convenience prelude for mutex strategy types.

pub use crate::config::{LockDefaults, ReleaseMode, StrategyConfig};
pub use crate::engine::StoreLockStrategy;
pub use crate::error::{LockError, LockResult};
pub use crate::request::{AcquireOptions, AcquisitionResult, LockMode, LockRequest};
pub use crate::store::LockStore;
pub use crate::token::{OwnershipToken, TokenGenerator};
pub use crate::traits::{LockStrategy, LockStrategyExt};
