//! Error types for vantage-storage

use thiserror::Error;

/// Result type alias for vantage-storage operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in vantage-storage
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A conditional create found an existing document.
    #[error("Document already exists: {collection}/{id}")]
    AlreadyExists {
        /// Collection name.
        collection: String,
        /// Document id.
        id: String,
    },

    /// A stored document does not match the expected shape.
    #[error("Invalid document {collection}/{id}: {reason}")]
    InvalidDocument {
        /// Collection name.
        collection: String,
        /// Document id.
        id: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The backend answered with an error status.
    #[error("Firestore returned HTTP {status}: {message}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body.
        message: String,
    },

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Could not obtain an access token
    #[error("Credential error: {0}")]
    Credentials(#[from] vantage_gcp_auth::Error),

    /// JSON (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid(collection: &str, id: &str, reason: impl ToString) -> Self {
        Self::InvalidDocument {
            collection: collection.to_string(),
            id: id.to_string(),
            reason: reason.to_string(),
        }
    }
}
