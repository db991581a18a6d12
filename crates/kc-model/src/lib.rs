//! # kc-model
//!
//! Domain models for Keycloak Rust (Realm, Client, Role).
//!
//! These are the reference entities identity-provider mappers resolve
//! role references against. User role membership itself lives behind the
//! storage traits in `kc-storage`.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod client;
pub mod realm;
pub mod role;

pub use client::Client;
pub use realm::Realm;
pub use role::Role;
