//! HTTP error mapping.
//!
//! Every failure leaves the server as
//! `{"error": {"category", "message"}, "detail": message}`.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use vantage_acl::{AuthzError, Denial, ReconcileError, SignUpError};

/// Result type for handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Errors a handler can return.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ApiError {
    /// The guard refused the request or the profile store failed.
    #[error(transparent)]
    Authz(#[from] AuthzError),

    /// A check after the guard refused the request.
    #[error(transparent)]
    Denied(#[from] Denial),

    /// Sign-in reconciliation failed.
    #[error("Invalid token or Firestore error: {0}")]
    SignIn(#[from] ReconcileError),

    /// Sign-up failed.
    #[error(transparent)]
    SignUp(#[from] SignUpError),

    /// The requested resource does not exist.
    #[error("{0}")]
    NotFound(&'static str),

    /// The request body could not be read.
    #[error("{0}")]
    BadRequest(String),

    /// A request could not be turned into document fields.
    #[error("Failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),

    /// The document store failed outside the guard.
    #[error("Firestore error: {0}")]
    Storage(#[from] vantage_storage::Error),
}

/// Broad error class, reported as `error.category`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// 401
    Authentication,
    /// 403
    Authorization,
    /// 404
    NotFound,
    /// 409
    Conflict,
    /// 400
    Validation,
    /// 500
    Dependency,
}

impl Category {
    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::Authorization => "authorization",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Validation => "validation",
            Self::Dependency => "dependency",
        }
    }

    /// Response status.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Authentication => StatusCode::UNAUTHORIZED,
            Self::Authorization => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::Dependency => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn denial_category(denial: &Denial) -> Category {
    if denial.is_authentication() {
        Category::Authentication
    } else {
        Category::Authorization
    }
}

impl ApiError {
    /// Classify the error.
    pub fn category(&self) -> Category {
        match self {
            Self::Authz(AuthzError::Denied(denial)) | Self::Denied(denial) => {
                denial_category(denial)
            }
            Self::Authz(_) => Category::Dependency,
            Self::SignIn(_) => Category::Authentication,
            Self::SignUp(err) => match err {
                SignUpError::InvalidRole(_) | SignUpError::InvalidRequest(_) => {
                    Category::Validation
                }
                SignUpError::EmailAlreadyExists(_) => Category::Conflict,
                _ => Category::Dependency,
            },
            Self::NotFound(_) => Category::NotFound,
            Self::BadRequest(_) => Category::Validation,
            Self::Encode(_) | Self::Storage(_) => Category::Dependency,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorDetail,
    detail: String,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    category: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let category = self.category();
        let status = category.status();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), %message, "Request refused");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                category: category.as_str(),
                message: message.clone(),
            },
            detail: message,
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
