//! Storage error types.

use thiserror::Error;

/// Errors raised by role, client and role mapping providers.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A role or client with the same identifier already exists in its
    /// scope.
    #[error("Duplicate {entity_type}: {field} '{value}' already exists")]
    Duplicate {
        /// Type of entity (e.g., "Role", "Client").
        entity_type: &'static str,
        /// Field that caused the conflict.
        field: &'static str,
        /// Conflicting value.
        value: String,
    },

    /// The request does not fit the stored data, such as a mapping for a
    /// role from another realm.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// The backing store could not be reached.
    #[error("Storage connection error: {0}")]
    Connection(String),

    /// Internal error.
    #[error("Internal storage error: {0}")]
    Internal(String),
}

impl StorageError {
    /// Creates a duplicate error.
    #[must_use]
    pub fn duplicate(
        entity_type: &'static str,
        field: &'static str,
        value: impl Into<String>,
    ) -> Self {
        Self::Duplicate {
            entity_type,
            field,
            value: value.into(),
        }
    }

    /// Checks if this is a duplicate error.
    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
