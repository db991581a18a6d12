//! Test harness for identity-provider role mapper conformance testing.
//!
//! Sets up a realm with one realm role and one client role in an
//! [`InMemoryStore`], and drives logins through the built-in mappers.

use std::sync::Once;

use kc_broker::{
    BrokeredAttribute, BrokeredIdentityContext, IdentityProviderMapperModel,
    IdentityProviderSyncMode, MapperContext, MapperRegistry, RoleReconciler, keys,
};
use kc_model::{Client, Realm, Role};
use kc_storage::{InMemoryStore, RoleMappingProvider};
use uuid::Uuid;

/// Realm used by every test.
pub const TEST_REALM: &str = "conformance";

/// Client owning the client-scoped role.
pub const TEST_CLIENT_ID: &str = "portal";

/// Name shared by the realm role and the client role.
pub const TEST_ROLE: &str = "operator";

/// Reference to the client-scoped role.
pub const TEST_CLIENT_ROLE_REF: &str = "portal.operator";

/// Alias of the brokered identity provider.
pub const TEST_IDP: &str = "corp-saml";

/// Attribute checked by the test mappers.
pub const GROUP_ATTRIBUTE: &str = "group";

/// Value of [`GROUP_ATTRIBUTE`] that makes the mappers apply.
pub const GROUP_VALUE: &str = "operators";

static TRACING: Once = Once::new();

/// Installs a test-writer tracing subscriber once per process.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A realm, a user and the roles mappers can target.
pub struct TestHarness {
    /// Backing store.
    pub store: InMemoryStore,
    /// Test realm.
    pub realm: Realm,
    /// Client owning [`TestHarness::client_role`].
    pub client: Client,
    /// Realm-scoped role.
    pub realm_role: Role,
    /// Client-scoped role of [`TestHarness::client`].
    pub client_role: Role,
    /// Local user being mapped.
    pub user_id: Uuid,
    /// Mapper registry with the built-in mappers.
    pub registry: MapperRegistry,
}

impl TestHarness {
    /// Creates the fixture realm.
    pub fn new() -> anyhow::Result<Self> {
        init_tracing();

        let store = InMemoryStore::new();
        let realm = Realm::new(TEST_REALM);
        let client = Client::new(realm.id, TEST_CLIENT_ID);
        let realm_role = Role::new_realm_role(realm.id, TEST_ROLE);
        let client_role = Role::new_client_role(realm.id, client.id, TEST_ROLE);

        store.add_client(client.clone())?;
        store.add_role(realm_role.clone())?;
        store.add_role(client_role.clone())?;

        Ok(Self {
            store,
            realm,
            client,
            realm_role,
            client_role,
            user_id: Uuid::now_v7(),
            registry: MapperRegistry::with_builtin_mappers(),
        })
    }

    /// Builds a mapper model granting `role_ref` to members of the
    /// operators group.
    #[must_use]
    pub fn mapper_model(mapper_type: &str, role_ref: &str) -> IdentityProviderMapperModel {
        IdentityProviderMapperModel::new("operators-to-role", TEST_IDP, mapper_type)
            .with_config(keys::ROLE, role_ref)
            .with_config(keys::ATTRIBUTE_NAME, GROUP_ATTRIBUTE)
            .with_config(keys::ATTRIBUTE_VALUE, GROUP_VALUE)
            .with_config(keys::SYNC_MODE, "FORCE")
    }

    /// Builds the brokered identity for one login.
    #[must_use]
    pub fn identity(applies: bool) -> BrokeredIdentityContext {
        let group = if applies { GROUP_VALUE } else { "visitors" };
        BrokeredIdentityContext::new("ext-user-1", TEST_IDP)
            .with_username("jdoe")
            .with_attribute(BrokeredAttribute::single(GROUP_ATTRIBUTE, group))
    }

    /// Returns a mapper context for this harness's user.
    #[must_use]
    pub fn ctx<'a>(&'a self, model: &'a IdentityProviderMapperModel) -> MapperContext<'a> {
        MapperContext {
            roles: &self.store,
            clients: &self.store,
            mappings: &self.store,
            realm: &self.realm,
            user_id: self.user_id,
            model,
        }
    }

    /// Returns a reconciler for this harness's user.
    #[must_use]
    pub fn reconciler(&self) -> RoleReconciler<'_> {
        RoleReconciler::new(&self.store, self.realm.id, self.user_id)
    }

    /// Runs a login for an existing user in `FORCE` mode.
    pub fn login(
        &self,
        model: &IdentityProviderMapperModel,
        identity: &mut BrokeredIdentityContext,
    ) -> anyhow::Result<()> {
        self.registry.run(
            &self.ctx(model),
            identity,
            false,
            IdentityProviderSyncMode::Force,
        )?;
        Ok(())
    }

    /// Checks whether the user directly holds `role`.
    pub fn holds(&self, role: &Role) -> anyhow::Result<bool> {
        Ok(self.reconciler().currently_held(role)?)
    }

    /// Makes the user hold `role` without going through a mapper.
    pub fn hold(&self, role: &Role) -> anyhow::Result<()> {
        self.store.grant_role(self.realm.id, self.user_id, role)?;
        Ok(())
    }

    /// Realm role ids currently granted to the user.
    pub fn realm_mappings(&self) -> anyhow::Result<Vec<Uuid>> {
        Ok(self
            .store
            .get_realm_role_mappings(self.realm.id, self.user_id)?
            .into_iter()
            .collect())
    }

    /// Client role ids of `client_id` currently granted to the user.
    pub fn client_mappings(&self, client_id: Uuid) -> anyhow::Result<Vec<Uuid>> {
        Ok(self
            .store
            .get_client_role_mappings(self.realm.id, self.user_id, client_id)?
            .into_iter()
            .collect())
    }
}
