//! # kc-broker
//!
//! Identity brokering mappers for Keycloak Rust.
//!
//! When a user logs in through an external identity provider, the broker
//! runs the provider's configured mappers to bring local state in line with
//! what the provider asserted. This crate provides the mapper SPI and the
//! attribute-to-role mappers built on it.
//!
//! ## Modules
//!
//! - [`config`] - Mapper model, configuration keys and sync modes
//! - [`context`] - Brokered identity context and the already-granted marker
//! - [`mapper`] - Mapper trait, invocation context, dispatch and registry
//! - [`reconcile`] - Minimal-write role reconciliation
//! - [`role_util`] - Role reference resolution
//! - [`attribute_role`] - Attribute-to-role mappers
//!
//! ## Example
//!
//! ```ignore
//! use kc_broker::{MapperContext, MapperRegistry, IdentityProviderSyncMode};
//!
//! let registry = MapperRegistry::with_builtin_mappers();
//! let ctx = MapperContext {
//!     roles: &store,
//!     clients: &store,
//!     mappings: &store,
//!     realm: &realm,
//!     user_id,
//!     model: &mapper_model,
//! };
//! registry.run(&ctx, &mut brokered, false, IdentityProviderSyncMode::Force)?;
//! ```

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod attribute_role;
pub mod config;
pub mod context;
pub mod error;
pub mod mapper;
pub mod reconcile;
pub mod role_util;

pub use attribute_role::{AttributeToRoleMapper, OptimizedAttributeToRoleMapper, attribute_applies};
pub use config::{IdentityProviderMapperModel, IdentityProviderSyncMode, MapperSyncMode, keys};
pub use context::{BrokeredAttribute, BrokeredIdentityContext};
pub use error::{BrokerError, BrokerResult};
pub use mapper::{IdentityProviderMapper, MapperContext, MapperRegistry, run_mapper};
pub use reconcile::{ReconcilePolicy, RoleAction, RoleReconciler, decide};
pub use role_util::role_from_string;
