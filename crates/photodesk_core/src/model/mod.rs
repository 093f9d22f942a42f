//! Entity model for photos and postal addresses.
//!
//! # Responsibility
//! - Define the shared identity scheme (surrogate key + external id).
//! - Define state records and the façades callers hold.
//!
//! # Invariants
//! - Every live entity carries an external id distinct from its storage key.
//! - Missing records are represented by null-object sentinels only at
//!   façade call sites; lower layers use `Option`.

pub mod address;
pub mod identity;
pub mod photo;
