//! Which hook runs for a login, and what each hook may write.

use broker_conformance_tests::{TEST_ROLE, TestHarness};
use kc_broker::{
    AttributeToRoleMapper, IdentityProviderSyncMode, OptimizedAttributeToRoleMapper, keys,
};

fn model(mode: &str) -> kc_broker::IdentityProviderMapperModel {
    TestHarness::mapper_model(OptimizedAttributeToRoleMapper::PROVIDER_ID, TEST_ROLE)
        .with_config(keys::SYNC_MODE, mode)
}

#[test]
fn test_first_login_imports_regardless_of_mode() -> anyhow::Result<()> {
    for mode in ["IMPORT", "LEGACY", "FORCE", "INHERIT"] {
        let h = TestHarness::new()?;
        let model = model(mode);

        h.registry.run(
            &h.ctx(&model),
            &mut TestHarness::identity(true),
            true,
            IdentityProviderSyncMode::Import,
        )?;

        assert!(h.holds(&h.realm_role)?, "mode={mode}");
    }
    Ok(())
}

#[test]
fn test_import_mode_never_updates() -> anyhow::Result<()> {
    let h = TestHarness::new()?;
    h.hold(&h.realm_role)?;
    let model = model("IMPORT");

    h.registry.run(
        &h.ctx(&model),
        &mut TestHarness::identity(false),
        false,
        IdentityProviderSyncMode::Force,
    )?;

    assert!(h.holds(&h.realm_role)?);
    assert_eq!(h.store.write_count(), 1);
    Ok(())
}

#[test]
fn test_legacy_mode_only_revokes() -> anyhow::Result<()> {
    let h = TestHarness::new()?;
    let model = model("LEGACY");

    h.registry.run(
        &h.ctx(&model),
        &mut TestHarness::identity(true),
        false,
        IdentityProviderSyncMode::Force,
    )?;
    assert!(!h.holds(&h.realm_role)?);

    h.hold(&h.realm_role)?;
    h.registry.run(
        &h.ctx(&model),
        &mut TestHarness::identity(false),
        false,
        IdentityProviderSyncMode::Force,
    )?;
    assert!(!h.holds(&h.realm_role)?);
    Ok(())
}

#[test]
fn test_inherit_follows_provider_mode() -> anyhow::Result<()> {
    let h = TestHarness::new()?;
    let model = model("INHERIT");

    h.registry.run(
        &h.ctx(&model),
        &mut TestHarness::identity(true),
        false,
        IdentityProviderSyncMode::Import,
    )?;
    assert!(!h.holds(&h.realm_role)?);

    h.registry.run(
        &h.ctx(&model),
        &mut TestHarness::identity(true),
        false,
        IdentityProviderSyncMode::Force,
    )?;
    assert!(h.holds(&h.realm_role)?);
    Ok(())
}

#[test]
fn test_base_mapper_rewrites_on_every_force_login() -> anyhow::Result<()> {
    let h = TestHarness::new()?;
    let model = TestHarness::mapper_model(AttributeToRoleMapper::PROVIDER_ID, TEST_ROLE);

    for _ in 0..3 {
        h.login(&model, &mut TestHarness::identity(true))?;
    }

    assert!(h.holds(&h.realm_role)?);
    assert_eq!(h.store.write_count(), 3);
    Ok(())
}

#[test]
fn test_unknown_sync_mode_is_rejected() -> anyhow::Result<()> {
    let h = TestHarness::new()?;
    let model = model("SOMETIMES");

    let result = h.registry.run(
        &h.ctx(&model),
        &mut TestHarness::identity(true),
        false,
        IdentityProviderSyncMode::Force,
    );

    assert!(result.is_err());
    assert_eq!(h.store.write_count(), 0);
    Ok(())
}
