//! Realm domain model.
//!
//! A realm scopes clients, roles and role mappings. Mapper warnings name
//! the realm a lookup failed in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A Keycloak realm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Realm {
    /// Unique identifier.
    pub id: Uuid,
    /// Unique realm name.
    pub name: String,
    /// Display name.
    pub display_name: Option<String>,
    /// Whether the realm is enabled.
    pub enabled: bool,
    /// When the realm was created.
    pub created_at: DateTime<Utc>,
}

impl Realm {
    /// Creates a new realm with default settings.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            display_name: None,
            enabled: true,
            created_at: Utc::now(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }
}
