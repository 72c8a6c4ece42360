//! Identity Toolkit admin client.
//!
//! Covers the three account operations Vantage needs: create an account,
//! replace its custom claims, and look it up (for revocation checks).

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use vantage_auth::{AuthError, AuthFuture, IdentityProvider, NewAccount};
use vantage_gcp_auth::{AccessTokenSource, StaticTokenSource};

/// Production Identity Toolkit endpoint.
pub const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com";

/// Firebase rejects custom claim payloads larger than this.
const MAX_CLAIMS_BYTES: usize = 1000;

/// Account details returned by `accounts:lookup`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    /// Account uid.
    #[serde(rename = "localId")]
    pub uid: String,
    /// Account email.
    #[serde(default)]
    pub email: Option<String>,
    /// Whether the account is disabled.
    #[serde(default)]
    pub disabled: bool,
    /// Revocation cut-off, seconds since the epoch, encoded as a string.
    #[serde(default)]
    valid_since: Option<String>,
    /// Custom claims, JSON-encoded.
    #[serde(default)]
    custom_attributes: Option<String>,
}

impl AccountInfo {
    /// Tokens issued before this time (seconds since the epoch) are revoked.
    pub fn valid_since(&self) -> Option<i64> {
        self.valid_since.as_deref().and_then(|s| s.parse().ok())
    }

    /// Decoded custom claims; empty when none are set.
    pub fn custom_claims(&self) -> Map<String, Value> {
        self.custom_attributes
            .as_deref()
            .and_then(|s| serde_json::from_str(s).ok())
            .unwrap_or_default()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    local_id: Option<&'a str>,
    email: &'a str,
    password: &'a str,
    email_verified: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateResponse {
    local_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRequest<'a> {
    local_id: &'a str,
    custom_attributes: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    local_id: [&'a str; 1],
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<AccountInfo>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Identity Toolkit REST client scoped to one Firebase project.
pub struct FirebaseAdmin {
    project_id: String,
    base_url: String,
    http: reqwest::Client,
    tokens: Arc<dyn AccessTokenSource>,
}

impl FirebaseAdmin {
    /// Client for the production endpoint.
    pub fn new(
        project_id: impl Into<String>,
        http: reqwest::Client,
        tokens: Arc<dyn AccessTokenSource>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            base_url: IDENTITY_TOOLKIT_URL.to_string(),
            http,
            tokens,
        }
    }

    /// Client for the Auth emulator at `host` (e.g. `localhost:9099`).
    pub fn emulator(host: &str, project_id: impl Into<String>, http: reqwest::Client) -> Self {
        Self::new(project_id, http, Arc::new(StaticTokenSource::emulator()))
            .with_base_url(format!("http://{host}/identitytoolkit.googleapis.com"))
    }

    /// Override the endpoint root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// The project this client administers.
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Look up an account by uid.
    pub async fn lookup(&self, uid: &str) -> Result<AccountInfo, AuthError> {
        let response: LookupResponse = self
            .call("accounts:lookup", &LookupRequest { local_id: [uid] }, uid)
            .await?;
        response
            .users
            .into_iter()
            .next()
            .ok_or_else(|| AuthError::UserNotFound(uid.to_string()))
    }

    async fn create(&self, account: NewAccount) -> Result<String, AuthError> {
        let request = CreateRequest {
            local_id: account.uid.as_deref(),
            email: &account.email,
            password: &account.password,
            email_verified: account.email_verified,
        };
        let response: CreateResponse = self.call("accounts", &request, &account.email).await?;
        log::info!("Created account {} for {}", response.local_id, account.email);
        Ok(response.local_id)
    }

    async fn update_claims(&self, uid: &str, claims: Map<String, Value>) -> Result<(), AuthError> {
        let custom_attributes = Value::Object(claims).to_string();
        if custom_attributes.len() > MAX_CLAIMS_BYTES {
            return Err(AuthError::Provider(format!(
                "custom claims exceed {MAX_CLAIMS_BYTES} bytes"
            )));
        }
        let request = UpdateRequest {
            local_id: uid,
            custom_attributes,
        };
        let _: Value = self.call("accounts:update", &request, uid).await?;
        log::debug!("Updated custom claims for {uid}");
        Ok(())
    }

    /// POST `body` to `{base}/v1/projects/{project}/{action}`.
    ///
    /// `subject` is the email or uid the call is about, used in error values.
    async fn call<B, R>(&self, action: &str, body: &B, subject: &str) -> Result<R, AuthError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let token = self
            .tokens
            .access_token()
            .await
            .map_err(|e| AuthError::Provider(format!("access token: {e}")))?;

        let url = format!(
            "{}/v1/projects/{}/{action}",
            self.base_url, self.project_id
        );
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::Provider(format!("{action} request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(classify(status.as_u16(), &message, subject));
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::Provider(format!("{action} response parse failed: {e}")))
    }
}

/// Map an Identity Toolkit error message onto an [`AuthError`].
///
/// Messages look like `EMAIL_EXISTS` or `USER_NOT_FOUND : detail`.
fn classify(status: u16, message: &str, subject: &str) -> AuthError {
    let code = message.split([' ', ':']).next().unwrap_or_default();
    match code {
        "EMAIL_EXISTS" | "DUPLICATE_EMAIL" => AuthError::EmailAlreadyExists(subject.to_string()),
        "USER_NOT_FOUND" => AuthError::UserNotFound(subject.to_string()),
        _ => AuthError::Provider(format!("HTTP {status}: {message}")),
    }
}

impl IdentityProvider for FirebaseAdmin {
    fn create_account<'a>(&'a self, account: NewAccount) -> AuthFuture<'a, String> {
        Box::pin(self.create(account))
    }

    fn set_custom_claims<'a>(
        &'a self,
        uid: &'a str,
        claims: Map<String, Value>,
    ) -> AuthFuture<'a, ()> {
        Box::pin(self.update_claims(uid, claims))
    }
}
