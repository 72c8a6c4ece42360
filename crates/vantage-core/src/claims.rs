//! Verified token claim sets.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Role;

/// Name of the custom claim carrying the account role.
pub const ROLE_CLAIM: &str = "role";

/// The decoded, verified contents of a bearer token.
///
/// Produced only by a token verifier; everything downstream treats it as
/// authentic as of the verification call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimSet {
    /// Identity-provider uid (`sub`).
    pub uid: String,

    /// Email, when the account has one.
    #[serde(default)]
    pub email: Option<String>,

    /// Issue time, seconds since the Unix epoch.
    pub issued_at: i64,

    /// Custom claims previously attached to the account.
    #[serde(default)]
    pub custom: Map<String, Value>,
}

impl ClaimSet {
    /// A claim set with no custom claims.
    pub fn new(uid: impl Into<String>, email: Option<String>, issued_at: i64) -> Self {
        Self {
            uid: uid.into(),
            email,
            issued_at,
            custom: Map::new(),
        }
    }

    /// The `role` custom claim, if present and recognised.
    pub fn role(&self) -> Option<Role> {
        self.custom
            .get(ROLE_CLAIM)
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
    }
}

/// Build the custom-claim payload that carries `role`.
pub fn role_claims(role: Role) -> Map<String, Value> {
    let mut claims = Map::new();
    claims.insert(ROLE_CLAIM.to_string(), Value::String(role.as_str().to_string()));
    claims
}
