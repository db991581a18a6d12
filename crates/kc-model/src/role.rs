//! Role domain model.
//!
//! Roles are realm-level or client-level. Mappers only ever reference
//! existing roles; they never create or delete them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::Client;

/// A Keycloak role.
///
/// Realm roles apply across the realm. Client roles belong to one client
/// application and are only meaningful within it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    // === Identity ===
    /// Unique identifier.
    pub id: Uuid,
    /// Role name (unique within realm or client).
    pub name: String,
    /// Role description.
    pub description: Option<String>,

    // === Scope ===
    /// Realm this role belongs to.
    pub realm_id: Uuid,
    /// Client this role belongs to (None for realm roles).
    pub client_id: Option<Uuid>,

    // === Timestamps ===
    /// When the role was created.
    pub created_at: DateTime<Utc>,
    /// When the role was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Role {
    /// Creates a new realm role.
    #[must_use]
    pub fn new_realm_role(realm_id: Uuid, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            description: None,
            realm_id,
            client_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a new client role.
    #[must_use]
    pub fn new_client_role(realm_id: Uuid, client_id: Uuid, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            description: None,
            realm_id,
            client_id: Some(client_id),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Checks if this is a realm role.
    #[must_use]
    pub const fn is_realm_role(&self) -> bool {
        self.client_id.is_none()
    }

    /// Checks if this is a client role.
    #[must_use]
    pub const fn is_client_role(&self) -> bool {
        self.client_id.is_some()
    }

    /// Returns the id of the container holding this role.
    ///
    /// That is the owning client for client roles and the realm otherwise.
    #[must_use]
    pub fn container_id(&self) -> Uuid {
        self.client_id.unwrap_or(self.realm_id)
    }

    /// Formats the role as a mapper role reference.
    ///
    /// Client roles are written `<client_id>.<name>` using the owning
    /// client's public identifier; realm roles are just the name.
    #[must_use]
    pub fn reference(&self, owner: Option<&Client>) -> String {
        match owner {
            Some(client) if self.client_id == Some(client.id) => {
                format!("{}.{}", client.client_id, self.name)
            }
            _ => self.name.clone(),
        }
    }
}

impl PartialEq for Role {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Role {}
