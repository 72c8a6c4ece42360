//! Error types for vantage-acl

use thiserror::Error;
use vantage_auth::AuthError;

/// Why the guard refused a request.
///
/// The display text is what callers see.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// The verified claims carry no uid.
    #[error("Could not validate user credentials.")]
    NoCredentials,

    /// The uid has no profile document.
    #[error("User profile not found in database.")]
    ProfileNotFound,

    /// The profile status is not `active`.
    #[error("User account is not active.")]
    InactiveAccount,

    /// The profile role is not in the allowed set.
    #[error("You do not have permission to access this resource.")]
    RoleNotAllowed,

    /// The caller tried to act on a resource owned by someone else.
    #[error("You can only submit a startup for your own account.")]
    OwnershipMismatch,
}

impl Denial {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoCredentials => "no_credentials",
            Self::ProfileNotFound => "profile_not_found",
            Self::InactiveAccount => "inactive_account",
            Self::RoleNotAllowed => "role_not_allowed",
            Self::OwnershipMismatch => "ownership_mismatch",
        }
    }

    /// Whether this denial means the caller is unauthenticated rather than
    /// unauthorized.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::NoCredentials)
    }
}

/// Errors from [`Guard::authorize`](crate::Guard::authorize).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AuthzError {
    /// The request was refused.
    #[error(transparent)]
    Denied(#[from] Denial),

    /// The profile store failed.
    #[error("An error occurred while verifying user role: {0}")]
    Store(#[from] vantage_storage::Error),
}

/// Errors from [`SignInReconciler::reconcile`](crate::SignInReconciler::reconcile).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ReconcileError {
    /// The profile store failed.
    #[error("Firestore error: {0}")]
    Store(#[from] vantage_storage::Error),

    /// The identity provider failed.
    #[error("Identity provider error: {0}")]
    Provider(#[from] AuthError),
}

/// Errors from [`SignUpService::sign_up`](crate::SignUpService::sign_up).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SignUpError {
    /// The requested role is unknown or not self-assignable.
    #[error("Invalid role '{0}'. Choose 'founder' or 'investor'.")]
    InvalidRole(String),

    /// Email or password missing.
    #[error("Invalid sign-up request: {0}")]
    InvalidRequest(String),

    /// The email already has an account.
    #[error("The email address {0} is already in use by another account.")]
    EmailAlreadyExists(String),

    /// The identity provider failed.
    #[error("Identity provider error: {0}")]
    Provider(AuthError),

    /// The profile store failed.
    #[error("Firestore error: {0}")]
    Store(#[from] vantage_storage::Error),
}

impl From<AuthError> for SignUpError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailAlreadyExists(email) => Self::EmailAlreadyExists(email),
            other => Self::Provider(other),
        }
    }
}
