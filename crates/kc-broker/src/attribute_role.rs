//! Attribute-to-role mappers.
//!
//! Grant a configured realm or client role when the identity provider
//! asserts an attribute with a given value, and take it away when it no
//! longer does.
//!
//! [`AttributeToRoleMapper`] writes on every `FORCE` login, whether or not
//! the membership changes. [`OptimizedAttributeToRoleMapper`] reads the
//! current membership first and only writes when it differs.

use crate::config::{IdentityProviderMapperModel, keys};
use crate::context::BrokeredIdentityContext;
use crate::error::BrokerResult;
use crate::mapper::{IdentityProviderMapper, MapperContext};
use crate::reconcile::{ReconcilePolicy, RoleAction};

/// Display category shared by role importing mappers.
pub const ROLE_IMPORTER_CATEGORY: &str = "Role Importer";

// ============================================================================
// Attribute Matching
// ============================================================================

/// Checks whether the brokered identity carries the configured attribute
/// value.
///
/// Attributes whose name or friendly name differ from a configured,
/// non-blank filter are skipped. A missing desired value matches the empty
/// string.
#[must_use]
pub fn attribute_applies(
    model: &IdentityProviderMapperModel,
    identity: &BrokeredIdentityContext,
) -> bool {
    let name = model.get_non_blank(keys::ATTRIBUTE_NAME);
    let friendly_name = model.get_non_blank(keys::ATTRIBUTE_FRIENDLY_NAME);
    let desired = model.get_or(keys::ATTRIBUTE_VALUE, "");

    identity
        .attributes()
        .iter()
        .filter(|attr| name.is_none_or(|n| attr.name == n))
        .filter(|attr| friendly_name.is_none_or(|f| attr.friendly_name.as_deref() == Some(f)))
        .any(|attr| attr.values.iter().any(|v| v == desired))
}

/// First login: grant the role when the attribute matches.
fn import_role(ctx: &MapperContext<'_>, identity: &BrokeredIdentityContext) -> BrokerResult<()> {
    let Some((role, _)) = ctx.target_role()? else {
        return Ok(());
    };
    if attribute_applies(ctx.model, identity) {
        ctx.reconciler().apply(&role, RoleAction::Grant)?;
    }
    Ok(())
}

/// `LEGACY` login: revoke the role when the attribute no longer matches.
fn revoke_stale_role(
    ctx: &MapperContext<'_>,
    identity: &BrokeredIdentityContext,
) -> BrokerResult<()> {
    let Some((role, _)) = ctx.target_role()? else {
        return Ok(());
    };
    if !attribute_applies(ctx.model, identity) {
        ctx.reconciler().apply(&role, RoleAction::Revoke)?;
    }
    Ok(())
}

// ============================================================================
// Attribute To Role Mapper
// ============================================================================

/// Grants a role when a brokered attribute has a given value.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeToRoleMapper;

impl AttributeToRoleMapper {
    /// Provider id.
    pub const PROVIDER_ID: &'static str = "saml-role-idp-mapper";

    /// Display type.
    pub const DISPLAY_TYPE: &'static str = "SAML Attribute to Role";

    /// Help text.
    pub const HELP_TEXT: &'static str =
        "If an attribute exists, grant the user the specified realm or client role.";
}

impl IdentityProviderMapper for AttributeToRoleMapper {
    fn id(&self) -> &'static str {
        Self::PROVIDER_ID
    }

    fn display_type(&self) -> &'static str {
        Self::DISPLAY_TYPE
    }

    fn display_category(&self) -> &'static str {
        ROLE_IMPORTER_CATEGORY
    }

    fn help_text(&self) -> &'static str {
        Self::HELP_TEXT
    }

    fn import_new_user(
        &self,
        ctx: &MapperContext<'_>,
        identity: &mut BrokeredIdentityContext,
    ) -> BrokerResult<()> {
        import_role(ctx, identity)
    }

    fn update_brokered_user_legacy(
        &self,
        ctx: &MapperContext<'_>,
        identity: &mut BrokeredIdentityContext,
    ) -> BrokerResult<()> {
        revoke_stale_role(ctx, identity)
    }

    fn update_brokered_user(
        &self,
        ctx: &MapperContext<'_>,
        identity: &mut BrokeredIdentityContext,
    ) -> BrokerResult<()> {
        let Some((role, reference)) = ctx.target_role()? else {
            return Ok(());
        };
        let applies = attribute_applies(ctx.model, identity);
        ctx.reconciler()
            .reconcile_unguarded(&role, reference, applies, identity)?;
        Ok(())
    }
}

// ============================================================================
// Optimized Attribute To Role Mapper
// ============================================================================

/// [`AttributeToRoleMapper`] that skips writes when the user already has
/// the right membership.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptimizedAttributeToRoleMapper {
    policy: ReconcilePolicy,
}

impl OptimizedAttributeToRoleMapper {
    /// Provider id.
    pub const PROVIDER_ID: &'static str = "saml-role-idp-mapper-optimized";

    /// Display type.
    pub const DISPLAY_TYPE: &'static str = "SAML Attribute to Role (optimized)";

    /// Help text.
    pub const HELP_TEXT: &'static str =
        "If an attribute exists, grant the user the specified realm or client role. (optimized)";

    /// Creates a mapper using the given short-circuit order.
    #[must_use]
    pub const fn with_policy(policy: ReconcilePolicy) -> Self {
        Self { policy }
    }

    /// Returns the short-circuit order in use.
    #[must_use]
    pub const fn policy(&self) -> ReconcilePolicy {
        self.policy
    }
}

impl IdentityProviderMapper for OptimizedAttributeToRoleMapper {
    fn id(&self) -> &'static str {
        Self::PROVIDER_ID
    }

    fn display_type(&self) -> &'static str {
        Self::DISPLAY_TYPE
    }

    fn display_category(&self) -> &'static str {
        ROLE_IMPORTER_CATEGORY
    }

    fn help_text(&self) -> &'static str {
        Self::HELP_TEXT
    }

    fn import_new_user(
        &self,
        ctx: &MapperContext<'_>,
        identity: &mut BrokeredIdentityContext,
    ) -> BrokerResult<()> {
        import_role(ctx, identity)
    }

    fn update_brokered_user_legacy(
        &self,
        ctx: &MapperContext<'_>,
        identity: &mut BrokeredIdentityContext,
    ) -> BrokerResult<()> {
        revoke_stale_role(ctx, identity)
    }

    fn update_brokered_user(
        &self,
        ctx: &MapperContext<'_>,
        identity: &mut BrokeredIdentityContext,
    ) -> BrokerResult<()> {
        let Some((role, reference)) = ctx.target_role()? else {
            return Ok(());
        };
        let applies = attribute_applies(ctx.model, identity);
        ctx.reconciler()
            .reconcile(self.policy, &role, reference, applies, identity)?;
        Ok(())
    }
}
