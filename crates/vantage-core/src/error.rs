//! Error types for vantage-core

use thiserror::Error;

/// Result type alias for vantage-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in vantage-core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A role string outside the closed role set.
    #[error("unknown role '{0}'")]
    UnknownRole(String),

    /// A status string outside the closed status set.
    #[error("unknown account status '{0}'")]
    UnknownStatus(String),
}
