//! Brokered identity context.
//!
//! The in-flight record of what an external identity provider asserted
//! about a user during one authentication attempt. It also carries the
//! roles already granted by earlier mappers in the same flow, so a later
//! mapper targeting the same role does not undo that grant.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// An attribute asserted by the external identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokeredAttribute {
    /// The attribute name (typically a URI for SAML).
    pub name: String,

    /// A human-readable name for the attribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,

    /// The attribute values.
    pub values: Vec<String>,
}

impl BrokeredAttribute {
    /// Creates a new attribute with a single value.
    #[must_use]
    pub fn single(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            friendly_name: None,
            values: vec![value.into()],
        }
    }

    /// Creates a new attribute with multiple values.
    #[must_use]
    pub fn multi(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            friendly_name: None,
            values,
        }
    }

    /// Sets the friendly name.
    #[must_use]
    pub fn with_friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = Some(name.into());
        self
    }
}

/// Context for one brokered login.
#[derive(Debug, Clone)]
pub struct BrokeredIdentityContext {
    /// User ID at the identity provider.
    pub id: String,
    /// Alias of the identity provider that authenticated the user.
    pub identity_provider_alias: String,
    /// Username at the identity provider.
    pub username: Option<String>,
    attributes: Vec<BrokeredAttribute>,
    mapper_granted_roles: HashSet<String>,
}

impl BrokeredIdentityContext {
    /// Creates a context for a freshly authenticated external identity.
    #[must_use]
    pub fn new(id: impl Into<String>, identity_provider_alias: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            identity_provider_alias: identity_provider_alias.into(),
            username: None,
            attributes: Vec::new(),
            mapper_granted_roles: HashSet::new(),
        }
    }

    /// Sets the username.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Adds an asserted attribute.
    #[must_use]
    pub fn with_attribute(mut self, attribute: BrokeredAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Returns the asserted attributes in the order they were received.
    #[must_use]
    pub fn attributes(&self) -> &[BrokeredAttribute] {
        &self.attributes
    }

    /// Checks whether an earlier mapper in this flow granted the role.
    #[must_use]
    pub fn has_mapper_granted_role(&self, role: &str) -> bool {
        self.mapper_granted_roles.contains(role)
    }

    /// Records that a mapper granted the role in this flow.
    pub fn add_mapper_granted_role(&mut self, role: impl Into<String>) {
        self.mapper_granted_roles.insert(role.into());
    }
}
