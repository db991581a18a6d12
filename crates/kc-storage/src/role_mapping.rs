//! User role mapping provider trait.

use std::collections::HashSet;

use kc_model::Role;
use uuid::Uuid;

use crate::error::StorageResult;

/// Provider for a user's direct role mappings.
///
/// Realm roles and client roles are kept in separate sets: one realm-wide
/// set per user and one set per (user, client). Grant and revoke are the
/// only mutations.
///
/// Implementations are responsible for their own locking or transaction
/// discipline when several flows touch the same user concurrently.
pub trait RoleMappingProvider: Send + Sync {
    /// Gets the IDs of realm roles directly granted to a user.
    fn get_realm_role_mappings(
        &self,
        realm_id: Uuid,
        user_id: Uuid,
    ) -> StorageResult<HashSet<Uuid>>;

    /// Gets the IDs of a client's roles directly granted to a user.
    fn get_client_role_mappings(
        &self,
        realm_id: Uuid,
        user_id: Uuid,
        client_id: Uuid,
    ) -> StorageResult<HashSet<Uuid>>;

    /// Grants a role to a user.
    ///
    /// The role's scope decides which mapping set is written.
    fn grant_role(&self, realm_id: Uuid, user_id: Uuid, role: &Role) -> StorageResult<()>;

    /// Removes a role mapping from a user.
    fn revoke_role(&self, realm_id: Uuid, user_id: Uuid, role: &Role) -> StorageResult<()>;
}
