//! Role- and status-based authorization.
//!
//! A [`Guard`] is built once per allowed-role set and shared by every
//! request it protects. Each check is a single profile read: the profile
//! document, not the token's role claim, is authoritative.

use std::collections::BTreeSet;
use std::sync::Arc;

use vantage_core::{ClaimSet, ProfileDocument, Role};
use vantage_storage::ProfileStore;

use crate::error::{AuthzError, Denial};

/// Gate that admits active accounts holding one of a set of roles.
#[derive(Clone)]
pub struct Guard {
    profiles: Arc<dyn ProfileStore>,
    allowed: BTreeSet<Role>,
}

impl Guard {
    /// Create a guard admitting `allowed_roles`.
    pub fn new(profiles: Arc<dyn ProfileStore>, allowed_roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            profiles,
            allowed: allowed_roles.into_iter().collect(),
        }
    }

    /// The roles this guard admits.
    pub fn allowed_roles(&self) -> &BTreeSet<Role> {
        &self.allowed
    }

    /// Load the caller's profile and decide.
    ///
    /// Returns the full profile on success. No retries.
    pub async fn authorize(&self, claims: &ClaimSet) -> Result<ProfileDocument, AuthzError> {
        if claims.uid.is_empty() {
            return Err(Denial::NoCredentials.into());
        }

        let profile = self.profiles.get(&claims.uid).await?;
        evaluate(profile, &self.allowed).map_err(|denial| {
            log::debug!("Denied {}: {}", claims.uid, denial.code());
            AuthzError::Denied(denial)
        })
    }
}

/// The decision table.
///
/// Missing profile first, then status, then role. A missing status or role
/// never passes.
pub fn evaluate(
    profile: Option<ProfileDocument>,
    allowed: &BTreeSet<Role>,
) -> Result<ProfileDocument, Denial> {
    let profile = profile.ok_or(Denial::ProfileNotFound)?;
    if !profile.is_active() {
        return Err(Denial::InactiveAccount);
    }
    match profile.role {
        Some(role) if allowed.contains(&role) => Ok(profile),
        _ => Err(Denial::RoleNotAllowed),
    }
}

/// Refuse unless the authorized caller is the owner of the resource.
pub fn ensure_owner(profile: &ProfileDocument, owner_uid: &str) -> Result<(), Denial> {
    if profile.uid == owner_uid {
        Ok(())
    } else {
        Err(Denial::OwnershipMismatch)
    }
}
