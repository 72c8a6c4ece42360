//! Account roles.
//!
//! Roles travel on the wire (profile documents, custom claims, sign-up
//! requests) in the deployment's vocabulary: `founder`, `investor`, `admin`.
//! The generic names `producer` / `consumer` are accepted when reading.
//! Reading goes through [`FromStr`] everywhere, so `"Founder"` in a stored
//! profile means the same as `"Founder"` in a sign-up request.

use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// The closed set of roles an account can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Role {
    /// Submits resources (a startup founder).
    #[serde(rename = "founder")]
    Producer,
    /// Reads resources (an investor).
    #[serde(rename = "investor")]
    Consumer,
    /// Platform administrator. Never self-assignable.
    #[serde(rename = "admin")]
    Admin,
}

impl Role {
    /// Role given to accounts that appear through a federated sign-in
    /// without a profile document.
    pub const DEFAULT: Role = Role::Producer;

    /// Every role, in declaration order.
    pub const ALL: [Role; 3] = [Role::Producer, Role::Consumer, Role::Admin];

    /// Wire spelling of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Producer => "founder",
            Self::Consumer => "investor",
            Self::Admin => "admin",
        }
    }

    /// Whether an account may pick this role for itself at sign-up.
    pub fn is_self_assignable(&self) -> bool {
        matches!(self, Self::Producer | Self::Consumer)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "founder" | "producer" => Ok(Self::Producer),
            "investor" | "consumer" => Ok(Self::Consumer),
            "admin" => Ok(Self::Admin),
            _ => Err(Error::UnknownRole(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
