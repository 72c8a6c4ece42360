//! Sign-in reconciliation.

use std::sync::Arc;

use serde::Serialize;
use vantage_auth::IdentityProvider;
use vantage_core::claims::role_claims;
use vantage_core::{ClaimSet, ProfileDocument, Role};
use vantage_storage::ProfileStore;

use crate::error::ReconcileError;

/// Outcome of a sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reconciled {
    /// Role now carried as the account's custom claim.
    pub role: Role,
    /// Whether this sign-in provisioned the profile document.
    pub created: bool,
}

/// Makes sure a signed-in account has a profile and a matching role claim.
#[derive(Clone)]
pub struct SignInReconciler {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileStore>,
}

impl SignInReconciler {
    /// Create a reconciler.
    pub fn new(identity: Arc<dyn IdentityProvider>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { identity, profiles }
    }

    /// Resolve the caller's role, provisioning a profile on first sign-in,
    /// then write the role claim.
    ///
    /// The claim write happens on every call, so a retry after a partial
    /// failure converges.
    pub async fn reconcile(&self, claims: &ClaimSet) -> Result<Reconciled, ReconcileError> {
        let uid = claims.uid.as_str();

        let (role, created) = match self.profiles.get(uid).await? {
            Some(profile) => {
                log::debug!("Profile for {uid} found; using stored role");
                (profile.role.unwrap_or(Role::DEFAULT), false)
            }
            None => self.provision(claims).await?,
        };

        self.identity.set_custom_claims(uid, role_claims(role)).await?;
        log::info!("Set role claim '{role}' for {uid}");

        Ok(Reconciled { role, created })
    }

    async fn provision(&self, claims: &ClaimSet) -> Result<(Role, bool), ReconcileError> {
        let profile = ProfileDocument::provision(&claims.uid, claims.email.clone(), Role::DEFAULT);

        match self.profiles.create(&profile).await {
            Ok(()) => {
                log::info!("Provisioned profile for {} with role '{}'", claims.uid, Role::DEFAULT);
                Ok((Role::DEFAULT, true))
            }
            Err(vantage_storage::Error::AlreadyExists { .. }) => {
                log::debug!("Lost provisioning race for {}; re-reading", claims.uid);
                let role = self
                    .profiles
                    .get(&claims.uid)
                    .await?
                    .and_then(|p| p.role)
                    .unwrap_or(Role::DEFAULT);
                Ok((role, false))
            }
            Err(e) => Err(e.into()),
        }
    }
}
