//! Role lookup provider trait.

use kc_model::Role;
use uuid::Uuid;

use crate::error::StorageResult;

/// Provider for role lookups.
///
/// Roles are reference data here: mappers resolve them by name and never
/// create or delete them. Implementations must be thread-safe.
pub trait RoleProvider: Send + Sync {
    /// Gets a role by ID.
    fn get_by_id(&self, realm_id: Uuid, id: Uuid) -> StorageResult<Option<Role>>;

    /// Gets a realm role by name.
    fn get_realm_role_by_name(&self, realm_id: Uuid, name: &str) -> StorageResult<Option<Role>>;

    /// Gets a client role by name.
    fn get_client_role_by_name(
        &self,
        realm_id: Uuid,
        client_id: Uuid,
        name: &str,
    ) -> StorageResult<Option<Role>>;
}
