//! Identity-provider mapper configuration.
//!
//! A mapper instance is configured through a flat string map, the same
//! shape the admin API stores. Typed accessors live on
//! [`IdentityProviderMapperModel`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{BrokerError, BrokerResult};

/// Well-known mapper configuration keys.
pub mod keys {
    /// Target role reference (`role` or `client-id.role`).
    pub const ROLE: &str = "role";
    /// Sync mode override for this mapper.
    pub const SYNC_MODE: &str = "syncMode";
    /// Name of the brokered attribute to match.
    pub const ATTRIBUTE_NAME: &str = "attribute.name";
    /// Friendly name of the brokered attribute to match.
    pub const ATTRIBUTE_FRIENDLY_NAME: &str = "attribute.friendly.name";
    /// Attribute value that makes the mapper apply.
    pub const ATTRIBUTE_VALUE: &str = "attribute.value";
}

// ============================================================================
// Sync Modes
// ============================================================================

/// When mappers re-run for users that already exist locally.
///
/// Set on the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdentityProviderSyncMode {
    /// Only revoke what no longer applies on later logins.
    #[default]
    Legacy,

    /// Mappers run on first login only.
    Import,

    /// Mappers fully reconcile on every login.
    Force,
}

/// Sync mode of a single mapper.
///
/// `Inherit` defers to the identity provider's [`IdentityProviderSyncMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MapperSyncMode {
    /// Use the identity provider's mode.
    #[default]
    Inherit,

    /// Only run on first login.
    Import,

    /// Legacy revoke-only behaviour on later logins.
    Legacy,

    /// Reconcile on every login.
    Force,
}

impl MapperSyncMode {
    /// Resolves the mode that applies given the identity provider's setting.
    #[must_use]
    pub const fn effective(self, provider: IdentityProviderSyncMode) -> IdentityProviderSyncMode {
        match self {
            Self::Inherit => provider,
            Self::Import => IdentityProviderSyncMode::Import,
            Self::Legacy => IdentityProviderSyncMode::Legacy,
            Self::Force => IdentityProviderSyncMode::Force,
        }
    }
}

impl FromStr for MapperSyncMode {
    type Err = BrokerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INHERIT" => Ok(Self::Inherit),
            "IMPORT" => Ok(Self::Import),
            "LEGACY" => Ok(Self::Legacy),
            "FORCE" => Ok(Self::Force),
            other => Err(BrokerError::config(format!("unknown sync mode '{other}'"))),
        }
    }
}

impl fmt::Display for MapperSyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Inherit => "INHERIT",
            Self::Import => "IMPORT",
            Self::Legacy => "LEGACY",
            Self::Force => "FORCE",
        };
        f.write_str(s)
    }
}

// ============================================================================
// Mapper Model
// ============================================================================

/// A configured identity-provider mapper instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityProviderMapperModel {
    /// Mapper ID.
    pub id: Uuid,

    /// Mapper name.
    pub name: String,

    /// Alias of the identity provider this mapper belongs to.
    pub identity_provider_alias: String,

    /// Provider ID of the mapper implementation.
    #[serde(rename = "identityProviderMapper")]
    pub mapper_type: String,

    /// Mapper-specific configuration.
    #[serde(default)]
    pub config: HashMap<String, String>,
}

impl IdentityProviderMapperModel {
    /// Creates a new mapper model.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        identity_provider_alias: impl Into<String>,
        mapper_type: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            identity_provider_alias: identity_provider_alias.into(),
            mapper_type: mapper_type.into(),
            config: HashMap::new(),
        }
    }

    /// Adds a config value.
    #[must_use]
    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// Gets a config value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.config.get(key).map(String::as_str)
    }

    /// Gets a config value, returning a default if not present.
    #[must_use]
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.config.get(key).map_or(default, String::as_str)
    }

    /// Gets a config value, treating blank values as absent.
    #[must_use]
    pub fn get_non_blank(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }

    /// Gets a config value as bool.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.config.get(key).and_then(|v| v.parse().ok())
    }

    /// Gets the configured target role reference.
    #[must_use]
    pub fn role(&self) -> Option<&str> {
        self.get(keys::ROLE)
    }

    /// Gets the mapper's sync mode (`Inherit` when unset).
    ///
    /// ## Errors
    ///
    /// Returns `BrokerError::Configuration` for an unknown mode.
    pub fn sync_mode(&self) -> BrokerResult<MapperSyncMode> {
        self.get(keys::SYNC_MODE)
            .map_or(Ok(MapperSyncMode::default()), |v| v.parse())
    }
}
