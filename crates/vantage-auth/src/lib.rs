//! Authentication primitives for Vantage.
//!
//! Provides:
//! - [`TokenVerifier`]: Trait for async bearer-token verification (implement per provider)
//! - [`IdentityProvider`]: Trait for the account operations Vantage performs on the provider
//! - [`AuthLayer`] / [`AuthService`]: Tower middleware parameterised over `TokenVerifier`
//! - [`AuthConfig`]: Configuration for the auth layer
//! - [`MemoryIdentityProvider`]: In-process provider for local development and tests
//! - [`AuthError`]: Auth-specific error types

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod error;
mod memory;
mod middleware;

use std::future::Future;
use std::pin::Pin;

use serde_json::{Map, Value};
use vantage_core::ClaimSet;

pub use error::AuthError;
pub use memory::MemoryIdentityProvider;
pub use middleware::{claims_from_parts, AuthLayer, AuthService};

/// Boxed future returned by the provider traits.
pub type AuthFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, AuthError>> + Send + 'a>>;

/// Configuration for the auth middleware.
#[derive(Clone, Debug, Default)]
pub struct AuthConfig {
    /// Whether to reject tokens issued before the account's last revocation.
    /// Costs one provider lookup per request.
    pub check_revocation: bool,
}

/// Trait for verifying bearer tokens and extracting the claim set.
///
/// Implement this for each identity provider. The middleware calls
/// `verify()` with the bearer token and stores the claim set on success.
pub trait TokenVerifier: Send + Sync + 'static {
    /// Verify a token and return its claims.
    fn verify<'a>(&'a self, token: &'a str, check_revocation: bool) -> AuthFuture<'a, ClaimSet>;
}

/// A new account to create with the identity provider.
#[derive(Debug, Clone, Default)]
pub struct NewAccount {
    /// Requested uid; the provider generates one when `None`.
    pub uid: Option<String>,
    /// Account email.
    pub email: String,
    /// Initial password.
    pub password: String,
    /// Mark the email as already verified.
    pub email_verified: bool,
}

/// Account operations Vantage performs against the identity provider.
pub trait IdentityProvider: Send + Sync + 'static {
    /// Create an account, returning its uid.
    ///
    /// Fails with [`AuthError::EmailAlreadyExists`] when the email is taken.
    fn create_account<'a>(&'a self, account: NewAccount) -> AuthFuture<'a, String>;

    /// Replace the account's custom claims.
    fn set_custom_claims<'a>(
        &'a self,
        uid: &'a str,
        claims: Map<String, Value>,
    ) -> AuthFuture<'a, ()>;
}
