//! Vantage Core: shared domain types.
//!
//! This crate provides the vocabulary every other Vantage crate speaks.
//! It has no internal Vantage dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`role`]: Closed role enumeration
//! - [`status`]: Closed account status enumeration
//! - [`profile`]: The per-user profile document
//! - [`claims`]: Verified token claim sets

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod claims;
pub mod error;
pub mod profile;
pub mod role;
pub mod status;

// Re-export key types at crate root for convenience
pub use claims::ClaimSet;
pub use error::{Error, Result};
pub use profile::ProfileDocument;
pub use role::Role;
pub use status::Status;

#[cfg(test)]
mod proptests;
