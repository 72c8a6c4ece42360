//! Account status.

use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// The closed set of account states.
///
/// Only [`Status::Active`] passes authorization. Nothing in this system
/// moves an account out of `Pending`; that transition belongs to an
/// activation workflow that does not exist yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Account may use the platform.
    Active,
    /// Account is awaiting review.
    Pending,
    /// Account has been switched off. Reads `deactivated` too.
    Inactive,
}

impl Status {
    /// Status given to newly provisioned accounts.
    pub const DEFAULT: Status = Status::Active;

    /// Wire spelling of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Inactive => "inactive",
        }
    }

    /// Returns `true` only for [`Status::Active`].
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "pending" => Ok(Self::Pending),
            "inactive" | "deactivated" => Ok(Self::Inactive),
            _ => Err(Error::UnknownStatus(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
