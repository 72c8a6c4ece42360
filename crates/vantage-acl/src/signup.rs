//! Self-service sign-up.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use vantage_auth::{IdentityProvider, NewAccount};
use vantage_core::claims::role_claims;
use vantage_core::{ProfileDocument, Role};
use vantage_storage::ProfileStore;

use crate::error::SignUpError;

/// A sign-up request as submitted by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct SignUpRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
    /// Requested role, `founder` or `investor`.
    pub role: String,
}

/// A completed sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedUp {
    /// The new account's uid.
    pub uid: String,
}

/// Creates an identity record, its profile, and its role claim.
#[derive(Clone)]
pub struct SignUpService {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileStore>,
}

impl SignUpService {
    /// Create a sign-up service.
    pub fn new(identity: Arc<dyn IdentityProvider>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { identity, profiles }
    }

    /// Validate the request, then create the account, its profile and its
    /// claim, in that order.
    ///
    /// Nothing is rolled back: a failure after the account exists leaves it
    /// without a profile or claim.
    pub async fn sign_up(&self, request: SignUpRequest) -> Result<SignedUp, SignUpError> {
        let role = validate(&request)?;

        let uid = self
            .identity
            .create_account(NewAccount {
                uid: None,
                email: request.email.trim().to_string(),
                password: request.password,
                email_verified: false,
            })
            .await?;

        let profile = ProfileDocument::provision(&uid, Some(request.email.trim().to_string()), role);
        if let Err(e) = self.profiles.create(&profile).await {
            log::warn!("Account {uid} created but its profile was not: {e}");
            return Err(e.into());
        }

        if let Err(e) = self.identity.set_custom_claims(&uid, role_claims(role)).await {
            log::warn!("Account {uid} created but its role claim was not set: {e}");
            return Err(SignUpError::Provider(e));
        }

        log::info!("Signed up {uid} as '{role}'");
        Ok(SignedUp { uid })
    }
}

/// Checks that need no external call.
fn validate(request: &SignUpRequest) -> Result<Role, SignUpError> {
    let role = request
        .role
        .parse::<Role>()
        .ok()
        .filter(Role::is_self_assignable)
        .ok_or_else(|| SignUpError::InvalidRole(request.role.clone()))?;

    if request.email.trim().is_empty() {
        return Err(SignUpError::InvalidRequest("email is required".to_string()));
    }
    if request.password.is_empty() {
        return Err(SignUpError::InvalidRequest("password is required".to_string()));
    }
    Ok(role)
}
