//! GCE / Cloud Run metadata server token source.

use async_trait::async_trait;

use crate::cache::{TokenCache, TokenResponse};
use crate::{AccessTokenSource, Result};

const DEFAULT_METADATA_URL: &str = "http://metadata.google.internal";
const TOKEN_PATH: &str = "/computeMetadata/v1/instance/service-accounts/default/token";

/// Token source backed by the instance metadata server.
pub struct MetadataTokenSource {
    base_url: String,
    http: reqwest::Client,
    cache: TokenCache,
}

impl MetadataTokenSource {
    /// Create a source talking to the standard metadata host.
    pub fn new(http: reqwest::Client) -> Self {
        Self::with_base_url(DEFAULT_METADATA_URL, http)
    }

    /// Create a source talking to a custom metadata host.
    pub fn with_base_url(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            cache: TokenCache::default(),
        }
    }

    async fn fetch(&self) -> Result<TokenResponse> {
        let response = self
            .http
            .get(format!("{}{TOKEN_PATH}", self.base_url))
            .header("Metadata-Flavor", "Google")
            .send()
            .await?;
        TokenResponse::from_response(response).await
    }
}

#[async_trait]
impl AccessTokenSource for MetadataTokenSource {
    async fn access_token(&self) -> Result<String> {
        self.cache.get_or_refresh(|| self.fetch()).await
    }
}
