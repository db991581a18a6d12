//! Worked login scenarios through the optimized mapper.

use broker_conformance_tests::{TEST_ROLE, TestHarness};
use kc_broker::{IdentityProviderMapperModel, OptimizedAttributeToRoleMapper, keys};

fn optimized() -> IdentityProviderMapperModel {
    TestHarness::mapper_model(OptimizedAttributeToRoleMapper::PROVIDER_ID, TEST_ROLE)
}

/// Attribute present, role not held: the role is granted.
#[test]
fn test_grant_when_attribute_appears() -> anyhow::Result<()> {
    let h = TestHarness::new()?;
    let model = optimized();
    let mut identity = TestHarness::identity(true);

    h.login(&model, &mut identity)?;

    assert!(h.holds(&h.realm_role)?);
    assert!(identity.has_mapper_granted_role(TEST_ROLE));
    assert_eq!(h.store.write_count(), 1);
    Ok(())
}

/// Attribute gone, role held: the role is revoked.
#[test]
fn test_revoke_when_attribute_disappears() -> anyhow::Result<()> {
    let h = TestHarness::new()?;
    h.hold(&h.realm_role)?;
    let model = optimized();

    h.login(&model, &mut TestHarness::identity(false))?;

    assert!(!h.holds(&h.realm_role)?);
    assert!(h.realm_mappings()?.is_empty());
    Ok(())
}

/// Attribute present, role already held: nothing is written.
#[test]
fn test_no_write_when_already_held() -> anyhow::Result<()> {
    let h = TestHarness::new()?;
    h.hold(&h.realm_role)?;
    let model = optimized();
    let writes_before = h.store.write_count();

    h.login(&model, &mut TestHarness::identity(true))?;

    assert!(h.holds(&h.realm_role)?);
    assert_eq!(h.store.write_count(), writes_before);
    Ok(())
}

/// An earlier mapper in the flow granted the role: nothing is written,
/// whether or not this mapper's attribute matches.
#[test]
fn test_no_write_when_granted_earlier_in_flow() -> anyhow::Result<()> {
    for applies in [true, false] {
        let h = TestHarness::new()?;
        let model = optimized();
        let mut identity = TestHarness::identity(applies);
        identity.add_mapper_granted_role(TEST_ROLE);

        h.login(&model, &mut identity)?;

        assert!(!h.holds(&h.realm_role)?);
        assert_eq!(h.store.write_count(), 0);
    }
    Ok(())
}

#[test]
fn test_two_mappers_same_role_in_one_flow() -> anyhow::Result<()> {
    let h = TestHarness::new()?;
    let granting = optimized();
    let other = optimized().with_config(keys::ATTRIBUTE_VALUE, "auditors");
    let mut identity = TestHarness::identity(true);

    h.login(&granting, &mut identity)?;
    h.login(&other, &mut identity)?;

    assert!(h.holds(&h.realm_role)?);
    assert_eq!(h.store.write_count(), 1);
    Ok(())
}

#[test]
fn test_repeated_logins_write_once() -> anyhow::Result<()> {
    let h = TestHarness::new()?;
    let model = optimized();

    for _ in 0..5 {
        h.login(&model, &mut TestHarness::identity(true))?;
    }

    assert!(h.holds(&h.realm_role)?);
    assert_eq!(h.store.write_count(), 1);
    Ok(())
}
