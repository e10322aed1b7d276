//! Ownership token generation.

use std::fmt;
use std::process;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Proof of ownership for one acquisition attempt.
///
/// The value is opaque to callers. Keep the token returned by a successful
/// acquire and hand it back on release.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnershipToken(String);

impl OwnershipToken {
    /// Returns the token as stored in the backing store.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the token, returning the raw value.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for OwnershipToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for OwnershipToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for OwnershipToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for OwnershipToken {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Produces ownership tokens for one strategy instance.
///
/// Format: `{instance_id}_{uuid_v4}`. The instance id is fixed for the
/// generator's lifetime; the suffix is fresh for every call.
#[derive(Debug, Clone)]
pub struct TokenGenerator {
    instance_id: String,
}

impl TokenGenerator {
    /// Creates a generator with an explicit instance id.
    pub fn new(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
        }
    }

    /// Creates a generator with a random instance id of the form `{pid}-{uuid}`.
    pub fn random() -> Self {
        Self::new(format!("{}-{}", process::id(), Uuid::new_v4().simple()))
    }

    /// Returns the stable instance id.
    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Generates a token for a new acquisition attempt.
    pub fn generate(&self) -> OwnershipToken {
        OwnershipToken(format!("{}_{}", self.instance_id, Uuid::new_v4()))
    }
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::random()
    }
}
