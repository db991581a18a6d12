//! Identity-provider mapper SPI.
//!
//! Mappers translate what an external identity provider asserted into
//! local state. The broker calls one hook per (user, mapper, login):
//!
//! - [`IdentityProviderMapper::import_new_user`] on first login
//! - [`IdentityProviderMapper::update_brokered_user_legacy`] on later logins
//!   in `LEGACY` sync mode
//! - [`IdentityProviderMapper::update_brokered_user`] on later logins in
//!   `FORCE` sync mode
//!
//! [`run_mapper`] picks the hook; [`MapperRegistry`] finds the mapper
//! implementation by the provider id stored on the mapper model.

use std::collections::HashMap;
use std::sync::Arc;

use kc_model::{Realm, Role};
use kc_storage::{ClientProvider, RoleMappingProvider, RoleProvider};
use uuid::Uuid;

use crate::attribute_role::{AttributeToRoleMapper, OptimizedAttributeToRoleMapper};
use crate::config::{IdentityProviderMapperModel, IdentityProviderSyncMode, MapperSyncMode};
use crate::context::BrokeredIdentityContext;
use crate::error::{BrokerError, BrokerResult};
use crate::reconcile::RoleReconciler;
use crate::role_util::role_from_string;

// ============================================================================
// Mapper Context
// ============================================================================

/// Collaborators handed to a mapper for one invocation.
#[derive(Clone, Copy)]
pub struct MapperContext<'a> {
    /// Role lookups.
    pub roles: &'a dyn RoleProvider,
    /// Client lookups.
    pub clients: &'a dyn ClientProvider,
    /// The user's role mappings.
    pub mappings: &'a dyn RoleMappingProvider,
    /// Realm the login happens in.
    pub realm: &'a Realm,
    /// Local user being mapped.
    pub user_id: Uuid,
    /// Configuration of the mapper being run.
    pub model: &'a IdentityProviderMapperModel,
}

impl<'a> MapperContext<'a> {
    /// Resolves the mapper's configured role.
    ///
    /// Returns the role together with the configured reference string.
    ///
    /// ## Errors
    ///
    /// Returns `BrokerError::UnresolvedRole` if the reference is missing or
    /// names no role, and propagates storage failures.
    pub fn resolve_target_role(&self) -> BrokerResult<(Role, &'a str)> {
        let reference = self.model.role().unwrap_or_default();
        role_from_string(self.roles, self.clients, self.realm, reference)?
            .map(|role| (role, reference))
            .ok_or_else(|| {
                BrokerError::unresolved_role(reference, &self.model.name, &self.realm.name)
            })
    }

    /// Resolves the configured role, logging and swallowing a miss.
    ///
    /// A misconfigured mapper must not block the login, so an unresolved
    /// role yields `Ok(None)` after a warning.
    ///
    /// ## Errors
    ///
    /// Propagates storage failures.
    pub fn target_role(&self) -> BrokerResult<Option<(Role, &'a str)>> {
        match self.resolve_target_role() {
            Ok(found) => Ok(Some(found)),
            Err(err @ BrokerError::UnresolvedRole { .. }) => {
                tracing::warn!(mapper_id = %self.model.id, "{}", err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Returns a reconciler bound to this context's user.
    #[must_use]
    pub fn reconciler(&self) -> RoleReconciler<'a> {
        RoleReconciler::new(self.mappings, self.realm.id, self.user_id)
    }
}

// ============================================================================
// Mapper Trait
// ============================================================================

/// Base trait for identity-provider mappers.
pub trait IdentityProviderMapper: Send + Sync {
    /// Returns the provider id used to look the mapper up.
    fn id(&self) -> &'static str;

    /// Returns the display type shown in the admin console.
    fn display_type(&self) -> &'static str;

    /// Returns the display category.
    fn display_category(&self) -> &'static str;

    /// Returns help text describing this mapper.
    fn help_text(&self) -> &'static str;

    /// Returns the sync modes this mapper supports.
    fn compatible_sync_modes(&self) -> &'static [IdentityProviderSyncMode] {
        &[
            IdentityProviderSyncMode::Import,
            IdentityProviderSyncMode::Legacy,
            IdentityProviderSyncMode::Force,
        ]
    }

    /// Validates a mapper model before it is stored.
    ///
    /// ## Errors
    ///
    /// Returns `BrokerError::Configuration` for a model of another mapper
    /// type, an unknown sync mode, or an explicit sync mode the mapper does
    /// not support.
    fn validate_config(&self, model: &IdentityProviderMapperModel) -> BrokerResult<()> {
        if model.mapper_type != self.id() {
            return Err(BrokerError::config(format!(
                "mapper type '{}' does not match '{}'",
                model.mapper_type,
                self.id()
            )));
        }
        let mode = model.sync_mode()?;
        let explicit = match mode {
            MapperSyncMode::Inherit => return Ok(()),
            MapperSyncMode::Import => IdentityProviderSyncMode::Import,
            MapperSyncMode::Legacy => IdentityProviderSyncMode::Legacy,
            MapperSyncMode::Force => IdentityProviderSyncMode::Force,
        };
        if self.compatible_sync_modes().contains(&explicit) {
            Ok(())
        } else {
            Err(BrokerError::config(format!(
                "sync mode {mode} is not supported by mapper '{}'",
                self.id()
            )))
        }
    }

    /// Called when the user logs in through the identity provider for the
    /// first time.
    ///
    /// ## Errors
    ///
    /// Propagates storage failures.
    fn import_new_user(
        &self,
        ctx: &MapperContext<'_>,
        identity: &mut BrokeredIdentityContext,
    ) -> BrokerResult<()>;

    /// Called on later logins in `LEGACY` sync mode.
    ///
    /// ## Errors
    ///
    /// Propagates storage failures.
    fn update_brokered_user_legacy(
        &self,
        _ctx: &MapperContext<'_>,
        _identity: &mut BrokeredIdentityContext,
    ) -> BrokerResult<()> {
        Ok(())
    }

    /// Called on later logins in `FORCE` sync mode.
    ///
    /// ## Errors
    ///
    /// Propagates storage failures.
    fn update_brokered_user(
        &self,
        _ctx: &MapperContext<'_>,
        _identity: &mut BrokeredIdentityContext,
    ) -> BrokerResult<()> {
        Ok(())
    }
}

/// Runs the hook matching the login and the effective sync mode.
///
/// ## Errors
///
/// Returns `BrokerError::Configuration` for an unknown sync mode on the
/// mapper model, and propagates errors from the hook.
pub fn run_mapper(
    mapper: &dyn IdentityProviderMapper,
    ctx: &MapperContext<'_>,
    identity: &mut BrokeredIdentityContext,
    is_new_user: bool,
    provider_sync_mode: IdentityProviderSyncMode,
) -> BrokerResult<()> {
    if is_new_user {
        return mapper.import_new_user(ctx, identity);
    }
    match ctx.model.sync_mode()?.effective(provider_sync_mode) {
        IdentityProviderSyncMode::Import => Ok(()),
        IdentityProviderSyncMode::Legacy => mapper.update_brokered_user_legacy(ctx, identity),
        IdentityProviderSyncMode::Force => mapper.update_brokered_user(ctx, identity),
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Registry of mapper implementations keyed by provider id.
#[derive(Default)]
pub struct MapperRegistry {
    mappers: HashMap<&'static str, Arc<dyn IdentityProviderMapper>>,
}

impl MapperRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in role mappers registered.
    #[must_use]
    pub fn with_builtin_mappers() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(AttributeToRoleMapper));
        registry.register(Arc::new(OptimizedAttributeToRoleMapper::default()));
        registry
    }

    /// Registers a mapper, replacing any mapper with the same id.
    pub fn register(&mut self, mapper: Arc<dyn IdentityProviderMapper>) {
        self.mappers.insert(mapper.id(), mapper);
    }

    /// Gets a mapper by provider id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Arc<dyn IdentityProviderMapper>> {
        self.mappers.get(id)
    }

    /// Returns the registered provider ids, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<_> = self.mappers.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Runs the mapper named by `ctx.model`.
    ///
    /// ## Errors
    ///
    /// Returns `BrokerError::Configuration` if no mapper is registered under
    /// the model's type, and propagates errors from [`run_mapper`].
    pub fn run(
        &self,
        ctx: &MapperContext<'_>,
        identity: &mut BrokeredIdentityContext,
        is_new_user: bool,
        provider_sync_mode: IdentityProviderSyncMode,
    ) -> BrokerResult<()> {
        let mapper = self.get(&ctx.model.mapper_type).ok_or_else(|| {
            BrokerError::config(format!("unknown mapper type '{}'", ctx.model.mapper_type))
        })?;
        run_mapper(mapper.as_ref(), ctx, identity, is_new_user, provider_sync_mode)
    }
}
