//! Role reference resolution.
//!
//! Mapper configuration names roles as plain strings: `admin` for a realm
//! role, `my-app.admin` for the `admin` role of client `my-app`. Client ids
//! may themselves contain dots, so every split point is tried left to right
//! and the first prefix naming an existing client wins.

use kc_model::{Realm, Role};
use kc_storage::{ClientProvider, RoleProvider, StorageResult};

/// Resolves a role reference against a realm.
///
/// Returns `Ok(None)` when the reference is blank or names no role. Once a
/// prefix matches a client the lookup is final, even if that client has no
/// such role.
///
/// ## Errors
///
/// Propagates storage failures from the providers.
pub fn role_from_string(
    roles: &dyn RoleProvider,
    clients: &dyn ClientProvider,
    realm: &Realm,
    reference: &str,
) -> StorageResult<Option<Role>> {
    if reference.trim().is_empty() {
        return Ok(None);
    }

    for (idx, _) in reference.match_indices('.') {
        let (client_id, role_name) = (&reference[..idx], &reference[idx + 1..]);
        if let Some(client) = clients.get_by_client_id(realm.id, client_id)? {
            return roles.get_client_role_by_name(realm.id, client.id, role_name);
        }
    }

    roles.get_realm_role_by_name(realm.id, reference)
}
