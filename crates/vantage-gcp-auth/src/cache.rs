//! Access-token cache shared by the refreshing token sources.

use std::future::Future;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::{Error, Result};

/// Tokens are refreshed this many seconds before they expire.
const REFRESH_MARGIN_SECS: i64 = 60;

/// OAuth2 token response (both the token endpoint and the metadata server).
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}

impl TokenResponse {
    /// Read a token response, turning non-success statuses into errors.
    pub(crate) async fn from_response(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::TokenEndpoint {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}

struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Single-flight token cache: concurrent callers wait on one refresh.
#[derive(Default)]
pub(crate) struct TokenCache {
    inner: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    pub(crate) async fn get_or_refresh<F, Fut>(&self, refresh: F) -> Result<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<TokenResponse>>,
    {
        let mut guard = self.inner.lock().await;

        if let Some(cached) = guard.as_ref() {
            if cached.expires_at - Duration::seconds(REFRESH_MARGIN_SECS) > Utc::now() {
                return Ok(cached.token.clone());
            }
        }

        let response = refresh().await?;
        tracing::debug!(expires_in = response.expires_in, "Refreshed access token");
        *guard = Some(CachedToken {
            token: response.access_token.clone(),
            expires_at: Utc::now() + Duration::seconds(response.expires_in),
        });
        Ok(response.access_token)
    }
}
