//! Firebase provider for Vantage.
//!
//! Implements the [`vantage_auth`] traits against Firebase Authentication:
//! - [`FirebaseTokenVerifier`]: ID token validation via the securetoken
//!   JWKS (cached for an hour), with an optional revocation check
//! - [`FirebaseAdmin`]: Identity Toolkit REST client: account creation,
//!   custom claims, account lookup
//!
//! Both work against the Auth emulator through [`FirebaseAdmin::emulator`],
//! except that the emulator's unsigned ID tokens are not accepted.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod admin;
mod verifier;

pub use admin::{AccountInfo, FirebaseAdmin, IDENTITY_TOOLKIT_URL};
pub use verifier::{FirebaseTokenVerifier, Jwk, SECURETOKEN_JWKS_URL};
