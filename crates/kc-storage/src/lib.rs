//! # kc-storage
//!
//! Storage abstraction traits for Keycloak Rust.
//!
//! This crate defines the provider interfaces identity-provider mappers use
//! to look up roles and clients and to read and change a user's role
//! mappings. Calls are synchronous: a mapper runs inside one request and
//! performs at most a handful of in-memory checks plus one mutation.
//!
//! ## Provider Traits
//!
//! - [`RoleProvider`] - Role lookups by id and name
//! - [`ClientProvider`] - Client lookups by id and `client_id`
//! - [`RoleMappingProvider`] - Realm and client role mappings of a user
//!
//! [`InMemoryStore`] implements all three.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod client;
pub mod error;
pub mod memory;
pub mod role;
pub mod role_mapping;

pub use client::ClientProvider;
pub use error::{StorageError, StorageResult};
pub use memory::InMemoryStore;
pub use role::RoleProvider;
pub use role_mapping::RoleMappingProvider;
