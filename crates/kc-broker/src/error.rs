//! Identity broker mapper error types.
//!
//! Mapper hooks never surface [`BrokerError::UnresolvedRole`] to the
//! authentication flow: it is logged where it is detected and the hook
//! degrades to a no-op. Storage failures propagate unchanged.

use kc_storage::StorageError;
use thiserror::Error;

/// Errors that can occur while running identity-provider mappers.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// The configured role reference does not name a role in the realm.
    #[error("Unable to find role '{role}' for mapper '{mapper}' on realm '{realm}'")]
    UnresolvedRole {
        /// Configured role reference (may be empty).
        role: String,
        /// Mapper name.
        mapper: String,
        /// Realm name.
        realm: String,
    },

    /// Invalid mapper configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Storage error while reading or writing role mappings.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl BrokerError {
    /// Creates an unresolved role error.
    #[must_use]
    pub fn unresolved_role(
        role: impl Into<String>,
        mapper: impl Into<String>,
        realm: impl Into<String>,
    ) -> Self {
        Self::UnresolvedRole {
            role: role.into(),
            mapper: mapper.into(),
            realm: realm.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Checks if this is an unresolved role error.
    #[must_use]
    pub const fn is_unresolved_role(&self) -> bool {
        matches!(self, Self::UnresolvedRole { .. })
    }
}

/// Result type for broker mapper operations.
pub type BrokerResult<T> = Result<T, BrokerError>;
