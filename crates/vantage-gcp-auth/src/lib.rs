//! Google Cloud OAuth2 access tokens.
//!
//! The Firebase admin and Firestore clients authenticate with a bearer
//! access token obtained from one of:
//!
//! - [`StaticTokenSource`]: a fixed token (the Firebase emulators accept `owner`)
//! - [`ServiceAccountTokenSource`]: a service account key, via the JWT-bearer grant
//! - [`MetadataTokenSource`]: the GCE / Cloud Run metadata server
//!
//! [`application_default`] picks between the last two the way Google's
//! client libraries do.

mod cache;
pub mod error;
mod metadata;
mod service_account;

use std::sync::Arc;

use async_trait::async_trait;

pub use error::{Error, Result};
pub use metadata::MetadataTokenSource;
pub use service_account::{ServiceAccountKey, ServiceAccountTokenSource};

/// Environment variable naming a service account key file.
pub const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Scopes requested for Firebase Auth and Firestore administration.
pub const FIREBASE_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/cloud-platform",
    "https://www.googleapis.com/auth/datastore",
    "https://www.googleapis.com/auth/identitytoolkit",
    "https://www.googleapis.com/auth/userinfo.email",
];

/// Anything that can hand out a bearer access token.
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    /// Return a token valid for at least the next minute.
    async fn access_token(&self) -> Result<String>;
}

/// A fixed token.
#[derive(Debug, Clone)]
pub struct StaticTokenSource {
    token: String,
}

impl StaticTokenSource {
    /// Wrap a fixed token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Token accepted by the Firebase Auth and Firestore emulators.
    pub fn emulator() -> Self {
        Self::new("owner")
    }
}

#[async_trait]
impl AccessTokenSource for StaticTokenSource {
    async fn access_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}

/// Resolve Application Default Credentials.
///
/// Uses the key file named by `GOOGLE_APPLICATION_CREDENTIALS` when set,
/// otherwise the metadata server.
pub fn application_default(http: reqwest::Client) -> Result<Arc<dyn AccessTokenSource>> {
    match std::env::var(CREDENTIALS_ENV) {
        Ok(path) if !path.is_empty() => {
            tracing::info!(path = %path, "Using service account credentials");
            let key = ServiceAccountKey::from_file(&path)?;
            Ok(Arc::new(ServiceAccountTokenSource::new(key, http)))
        }
        _ => {
            tracing::info!("No {CREDENTIALS_ENV} set; using the metadata server");
            Ok(Arc::new(MetadataTokenSource::new(http)))
        }
    }
}
