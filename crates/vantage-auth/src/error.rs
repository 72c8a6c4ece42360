//! Auth-specific error types.

/// Errors that can occur while talking to the identity provider.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header or bearer token present.
    #[error("missing authentication token")]
    MissingToken,

    /// Token is malformed, expired, or fails signature/issuer/audience checks.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// Token was issued before the account's last revocation.
    #[error("token has been revoked")]
    Revoked,

    /// The account behind the token is disabled.
    #[error("user account is disabled")]
    UserDisabled,

    /// No key in the JWKS matches the token's kid.
    #[error("no matching key for kid '{0}'")]
    NoMatchingKey(String),

    /// Failed to fetch signing keys from the identity provider.
    #[error("failed to fetch signing keys: {0}")]
    KeyFetch(String),

    /// Account creation hit an existing email.
    #[error("email already exists: {0}")]
    EmailAlreadyExists(String),

    /// The provider has no account with this uid.
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// Any other identity-provider failure (transport, unexpected response).
    #[error("identity provider error: {0}")]
    Provider(String),
}

impl AuthError {
    /// Whether this error should result in a 401 (vs. a 500).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AuthError::MissingToken
                | AuthError::InvalidToken(_)
                | AuthError::Revoked
                | AuthError::UserDisabled
                | AuthError::NoMatchingKey(_)
        )
    }
}
