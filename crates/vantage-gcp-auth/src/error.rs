//! Error types for vantage-gcp-auth

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for vantage-gcp-auth operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while obtaining an access token
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The credentials file could not be read.
    #[error("failed to read credentials file {}: {source}", path.display())]
    Io {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The credentials file is not a usable service account key.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// The JWT assertion could not be signed.
    #[error("failed to sign token assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    /// Transport failure talking to the token endpoint.
    #[error("token request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The token endpoint answered with a non-success status.
    #[error("token endpoint returned {status}: {body}")]
    TokenEndpoint {
        /// HTTP status code
        status: u16,
        /// Response body, verbatim
        body: String,
    },
}
