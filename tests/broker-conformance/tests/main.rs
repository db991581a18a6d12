//! Role Mapper Conformance Test Suite
//!
//! Drives the built-in attribute-to-role mappers through full logins
//! against an in-memory realm and checks the membership guarantees the
//! broker relies on.
//!
//! ## Test Groups
//!
//! - Reconciliation truth table and write minimality
//! - Worked login scenarios
//! - Client-role isolation
//! - Sync-mode dispatch
//! - Misconfigured mappers
//! - Store failure propagation
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p broker-conformance-tests
//! cargo test -p broker-conformance-tests truth_table
//! ```

mod scenarios;
mod sync_modes;
