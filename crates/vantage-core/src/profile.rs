//! The per-user profile document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Role, Status};

/// Profile document stored in the `users` collection, keyed by uid.
///
/// `role` and `status` are optional because documents written by other
/// tools may lack them; a missing value is never silently filled in here.
/// Unknown values fail deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDocument {
    /// Identity-provider uid; also the document key.
    pub uid: String,

    /// Email address at provisioning time.
    #[serde(default)]
    pub email: Option<String>,

    /// Account role.
    #[serde(default)]
    pub role: Option<Role>,

    /// Account status.
    #[serde(default)]
    pub status: Option<Status>,

    /// Provisioning time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ProfileDocument {
    /// Name of the collection profile documents live in.
    pub const COLLECTION: &'static str = "users";

    /// A freshly provisioned profile: the given role, active, created now.
    pub fn provision(uid: impl Into<String>, email: Option<String>, role: Role) -> Self {
        Self {
            uid: uid.into(),
            email,
            role: Some(role),
            status: Some(Status::DEFAULT),
            created_at: Some(Utc::now()),
        }
    }

    /// Whether the account status is exactly `active`.
    pub fn is_active(&self) -> bool {
        self.status.is_some_and(|s| s.is_active())
    }
}
