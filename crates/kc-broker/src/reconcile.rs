//! Role reconciliation.
//!
//! Brings one user's membership in one role in line with a mapper's
//! decision, using at most one grant or revoke and none when the membership
//! already matches.
//!
//! The decision itself is the pure [`decide`] function. [`RoleReconciler`]
//! reads the current membership, runs the decision and applies it to the
//! role mapping store.
//!
//! ## State machine
//!
//! Per (user, role) there are two states, held and not held. `applies`
//! drives NOT_HELD → HELD and HELD → NOT_HELD. Self-transitions are
//! suppressed, and every transition is suppressed when an earlier mapper in
//! the same flow already granted the role.

use kc_model::Role;
use kc_storage::{RoleMappingProvider, StorageResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::context::BrokeredIdentityContext;

/// Membership change to perform for one (user, role) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleAction {
    /// Add the role mapping.
    Grant,
    /// Remove the role mapping.
    Revoke,
    /// Leave the membership as it is.
    NoOp,
}

impl RoleAction {
    /// Returns true if the action writes to the role mapping store.
    #[must_use]
    pub const fn is_write(self) -> bool {
        !matches!(self, Self::NoOp)
    }
}

/// Computes the minimal membership change.
///
/// `already_granted` wins over everything else: a role granted by an
/// earlier mapper in the same flow is neither re-granted nor revoked.
#[must_use]
pub const fn decide(applies: bool, currently_held: bool, already_granted: bool) -> RoleAction {
    if already_granted {
        return RoleAction::NoOp;
    }
    match (applies, currently_held) {
        (true, false) => RoleAction::Grant,
        (false, true) => RoleAction::Revoke,
        (true, true) | (false, false) => RoleAction::NoOp,
    }
}

/// Order in which the optimized reconciliation checks its short-circuits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReconcilePolicy {
    /// Check the flow's already-granted marker first, then membership.
    ///
    /// The marker is recorded whenever the role applies, held or not.
    #[default]
    GrantedFirst,

    /// Compare membership with the decision first and stop when they match,
    /// skipping marker bookkeeping; otherwise run the unguarded procedure.
    MembershipFirst,
}

/// Reconciles role membership for one user.
pub struct RoleReconciler<'a> {
    mappings: &'a dyn RoleMappingProvider,
    realm_id: Uuid,
    user_id: Uuid,
}

impl<'a> RoleReconciler<'a> {
    /// Creates a reconciler for a user in a realm.
    #[must_use]
    pub fn new(mappings: &'a dyn RoleMappingProvider, realm_id: Uuid, user_id: Uuid) -> Self {
        Self {
            mappings,
            realm_id,
            user_id,
        }
    }

    /// Checks whether the user directly holds the role.
    ///
    /// Client roles are looked up in the owning client's mapping set, realm
    /// roles in the realm-wide set.
    ///
    /// ## Errors
    ///
    /// Propagates storage failures.
    pub fn currently_held(&self, role: &Role) -> StorageResult<bool> {
        let held = match role.client_id {
            Some(client_id) => self
                .mappings
                .get_client_role_mappings(self.realm_id, self.user_id, client_id)?,
            None => self
                .mappings
                .get_realm_role_mappings(self.realm_id, self.user_id)?,
        };
        Ok(held.contains(&role.id))
    }

    /// Performs an action against the role mapping store.
    ///
    /// ## Errors
    ///
    /// Propagates storage failures.
    pub fn apply(&self, role: &Role, action: RoleAction) -> StorageResult<()> {
        if action.is_write() {
            tracing::debug!(
                user_id = %self.user_id,
                role = %role.name,
                client_id = ?role.client_id,
                ?action,
                "Updating brokered role mapping"
            );
        }
        match action {
            RoleAction::Grant => self.mappings.grant_role(self.realm_id, self.user_id, role),
            RoleAction::Revoke => self.mappings.revoke_role(self.realm_id, self.user_id, role),
            RoleAction::NoOp => Ok(()),
        }
    }

    /// Reconciles without consulting current membership.
    ///
    /// Unless the marker already names `reference`, grants (and marks) when
    /// the role applies and revokes otherwise. Always writes when it acts.
    ///
    /// ## Errors
    ///
    /// Propagates storage failures.
    pub fn reconcile_unguarded(
        &self,
        role: &Role,
        reference: &str,
        applies: bool,
        ctx: &mut BrokeredIdentityContext,
    ) -> StorageResult<RoleAction> {
        if ctx.has_mapper_granted_role(reference) {
            return Ok(RoleAction::NoOp);
        }
        let action = if applies {
            ctx.add_mapper_granted_role(reference);
            RoleAction::Grant
        } else {
            RoleAction::Revoke
        };
        self.apply(role, action)?;
        Ok(action)
    }

    /// Reconciles with the membership guard, skipping redundant writes.
    ///
    /// `reference` is the role reference as configured on the mapper; it is
    /// the key used in the flow's already-granted marker.
    ///
    /// ## Errors
    ///
    /// Propagates storage failures.
    pub fn reconcile(
        &self,
        policy: ReconcilePolicy,
        role: &Role,
        reference: &str,
        applies: bool,
        ctx: &mut BrokeredIdentityContext,
    ) -> StorageResult<RoleAction> {
        match policy {
            ReconcilePolicy::GrantedFirst => {
                let already_granted = ctx.has_mapper_granted_role(reference);
                // membership is only read when the marker does not short-circuit
                let currently_held = !already_granted && self.currently_held(role)?;
                if applies && !already_granted {
                    ctx.add_mapper_granted_role(reference);
                }
                let action = decide(applies, currently_held, already_granted);
                self.apply(role, action)?;
                Ok(action)
            }
            ReconcilePolicy::MembershipFirst => {
                if applies == self.currently_held(role)? {
                    return Ok(RoleAction::NoOp);
                }
                self.reconcile_unguarded(role, reference, applies, ctx)
            }
        }
    }
}
