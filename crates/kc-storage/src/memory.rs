//! In-memory storage backend.
//!
//! Holds roles, clients and user role mappings in process memory. Useful
//! for tests and embedded setups; every grant and revoke is counted so
//! callers can assert on the number of persistence operations.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use kc_model::{Client, Role};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::client::ClientProvider;
use crate::error::{StorageError, StorageResult};
use crate::role::RoleProvider;
use crate::role_mapping::RoleMappingProvider;

/// Key of a user's realm role set: `(realm_id, user_id)`.
type RealmMappingKey = (Uuid, Uuid);

/// Key of a user's client role set: `(realm_id, user_id, client_id)`.
type ClientMappingKey = (Uuid, Uuid, Uuid);

/// Thread-safe in-memory store implementing the lookup and mapping traits.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    roles: RwLock<HashMap<Uuid, Role>>,
    clients: RwLock<HashMap<Uuid, Client>>,
    realm_mappings: RwLock<HashMap<RealmMappingKey, HashSet<Uuid>>>,
    client_mappings: RwLock<HashMap<ClientMappingKey, HashSet<Uuid>>>,
    writes: AtomicU64,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a role.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Duplicate` if a role with the same name exists
    /// in the same scope (realm or client).
    pub fn add_role(&self, role: Role) -> StorageResult<()> {
        let mut roles = self.roles.write();
        let clash = roles.values().any(|r| {
            r.realm_id == role.realm_id && r.client_id == role.client_id && r.name == role.name
        });
        if clash {
            return Err(StorageError::duplicate("Role", "name", role.name));
        }
        roles.insert(role.id, role);
        Ok(())
    }

    /// Registers a client.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Duplicate` if the realm already has a client
    /// with the same `client_id`.
    pub fn add_client(&self, client: Client) -> StorageResult<()> {
        let mut clients = self.clients.write();
        let clash = clients
            .values()
            .any(|c| c.realm_id == client.realm_id && c.client_id == client.client_id);
        if clash {
            return Err(StorageError::duplicate("Client", "client_id", client.client_id));
        }
        clients.insert(client.id, client);
        Ok(())
    }

    /// Returns how many grant/revoke operations have been performed.
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Checks that a role lives in the realm it is being mapped in.
    fn check_realm(realm_id: Uuid, role: &Role) -> StorageResult<()> {
        if role.realm_id == realm_id {
            Ok(())
        } else {
            Err(StorageError::InvalidData(format!(
                "role '{}' does not belong to realm {realm_id}",
                role.name
            )))
        }
    }
}

impl RoleProvider for InMemoryStore {
    fn get_by_id(&self, realm_id: Uuid, id: Uuid) -> StorageResult<Option<Role>> {
        Ok(self
            .roles
            .read()
            .get(&id)
            .filter(|r| r.realm_id == realm_id)
            .cloned())
    }

    fn get_realm_role_by_name(&self, realm_id: Uuid, name: &str) -> StorageResult<Option<Role>> {
        Ok(self
            .roles
            .read()
            .values()
            .find(|r| r.realm_id == realm_id && r.is_realm_role() && r.name == name)
            .cloned())
    }

    fn get_client_role_by_name(
        &self,
        realm_id: Uuid,
        client_id: Uuid,
        name: &str,
    ) -> StorageResult<Option<Role>> {
        Ok(self
            .roles
            .read()
            .values()
            .find(|r| r.realm_id == realm_id && r.client_id == Some(client_id) && r.name == name)
            .cloned())
    }
}

impl ClientProvider for InMemoryStore {
    fn get_by_id(&self, realm_id: Uuid, id: Uuid) -> StorageResult<Option<Client>> {
        Ok(self
            .clients
            .read()
            .get(&id)
            .filter(|c| c.realm_id == realm_id)
            .cloned())
    }

    fn get_by_client_id(&self, realm_id: Uuid, client_id: &str) -> StorageResult<Option<Client>> {
        Ok(self
            .clients
            .read()
            .values()
            .find(|c| c.realm_id == realm_id && c.client_id == client_id)
            .cloned())
    }
}

impl RoleMappingProvider for InMemoryStore {
    fn get_realm_role_mappings(
        &self,
        realm_id: Uuid,
        user_id: Uuid,
    ) -> StorageResult<HashSet<Uuid>> {
        Ok(self
            .realm_mappings
            .read()
            .get(&(realm_id, user_id))
            .cloned()
            .unwrap_or_default())
    }

    fn get_client_role_mappings(
        &self,
        realm_id: Uuid,
        user_id: Uuid,
        client_id: Uuid,
    ) -> StorageResult<HashSet<Uuid>> {
        Ok(self
            .client_mappings
            .read()
            .get(&(realm_id, user_id, client_id))
            .cloned()
            .unwrap_or_default())
    }

    fn grant_role(&self, realm_id: Uuid, user_id: Uuid, role: &Role) -> StorageResult<()> {
        Self::check_realm(realm_id, role)?;
        match role.client_id {
            Some(client_id) => {
                self.client_mappings
                    .write()
                    .entry((realm_id, user_id, client_id))
                    .or_default()
                    .insert(role.id);
            }
            None => {
                self.realm_mappings
                    .write()
                    .entry((realm_id, user_id))
                    .or_default()
                    .insert(role.id);
            }
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn revoke_role(&self, realm_id: Uuid, user_id: Uuid, role: &Role) -> StorageResult<()> {
        Self::check_realm(realm_id, role)?;
        match role.client_id {
            Some(client_id) => {
                if let Some(set) = self
                    .client_mappings
                    .write()
                    .get_mut(&(realm_id, user_id, client_id))
                {
                    set.remove(&role.id);
                }
            }
            None => {
                if let Some(set) = self.realm_mappings.write().get_mut(&(realm_id, user_id)) {
                    set.remove(&role.id);
                }
            }
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
