//! Firebase ID token verification.

use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::{Map, Value};

use vantage_auth::{AuthError, AuthFuture, TokenVerifier};
use vantage_core::ClaimSet;

use crate::admin::FirebaseAdmin;

/// TTL for cached JWKS keys (1 hour).
const JWKS_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Signing keys for Firebase ID tokens.
pub const SECURETOKEN_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// Issuer prefix; the project id completes it.
const ISSUER_PREFIX: &str = "https://securetoken.google.com/";

/// Clock skew tolerated on `iat` / `auth_time`, matching the `exp` leeway.
const LEEWAY_SECS: i64 = 60;

/// Longest uid Firebase issues.
const MAX_UID_LEN: usize = 128;

/// Claims that describe the token itself rather than the account's
/// custom claims.
const RESERVED_CLAIMS: &[&str] = &[
    "acr",
    "amr",
    "at_hash",
    "aud",
    "auth_time",
    "azp",
    "c_hash",
    "cnf",
    "email",
    "email_verified",
    "exp",
    "firebase",
    "iat",
    "iss",
    "jti",
    "name",
    "nbf",
    "nonce",
    "phone_number",
    "picture",
    "sub",
    "user_id",
];

/// A single JSON Web Key from the securetoken JWKS endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    /// Key ID, matched against the JWT header's `kid`.
    pub kid: String,
    /// RSA modulus (base64url-encoded).
    pub n: String,
    /// RSA exponent (base64url-encoded).
    pub e: String,
}

#[derive(Debug, Deserialize)]
struct JwksResponse {
    keys: Vec<Jwk>,
}

struct CachedKeys {
    keys: Vec<Jwk>,
    fetched_at: Instant,
}

/// Firebase ID token claims.
#[derive(Debug, Deserialize)]
struct FirebaseClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    iat: i64,
    #[serde(default)]
    auth_time: Option<i64>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

/// Verifies Firebase ID tokens for one project.
pub struct FirebaseTokenVerifier {
    cached: RwLock<Option<CachedKeys>>,
    jwks_url: String,
    http_client: Option<reqwest::Client>,
    admin: Arc<FirebaseAdmin>,
}

impl FirebaseTokenVerifier {
    /// Create a verifier for `admin`'s project, fetching keys from the
    /// securetoken JWKS endpoint.
    pub fn new(admin: Arc<FirebaseAdmin>, http: reqwest::Client) -> Self {
        Self {
            cached: RwLock::new(None),
            jwks_url: SECURETOKEN_JWKS_URL.to_string(),
            http_client: Some(http),
            admin,
        }
    }

    /// Fetch keys from a different JWKS URL.
    pub fn with_jwks_url(mut self, jwks_url: impl Into<String>) -> Self {
        self.jwks_url = jwks_url.into();
        self
    }

    /// Create a verifier with pre-loaded keys (for testing).
    #[cfg(test)]
    pub fn with_static_keys(admin: Arc<FirebaseAdmin>, keys: Vec<Jwk>) -> Self {
        Self {
            cached: RwLock::new(Some(CachedKeys {
                keys,
                fetched_at: Instant::now(),
            })),
            jwks_url: String::new(),
            http_client: None,
            admin,
        }
    }

    async fn verify_token(
        &self,
        token: &str,
        check_revocation: bool,
    ) -> Result<ClaimSet, AuthError> {
        let claims = self.verify_jwt(token).await?;

        if check_revocation {
            self.check_revoked(&claims).await?;
        }

        let custom = claims
            .rest
            .into_iter()
            .filter(|(name, _)| !RESERVED_CLAIMS.contains(&name.as_str()))
            .collect();

        Ok(ClaimSet {
            uid: claims.sub,
            email: claims.email,
            issued_at: claims.iat,
            custom,
        })
    }

    /// Signature, issuer, audience and time checks.
    async fn verify_jwt(&self, token: &str) -> Result<FirebaseClaims, AuthError> {
        let header = decode_header(token).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        if header.alg != Algorithm::RS256 {
            return Err(AuthError::InvalidToken(format!(
                "unexpected algorithm {:?}",
                header.alg
            )));
        }
        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidToken("missing kid in JWT header".to_string()))?;

        let key = self.find_key(&kid).await?;
        let decoding_key = DecodingKey::from_rsa_components(&key.n, &key.e)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        let project_id = self.admin.project_id();
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[project_id]);
        validation.set_issuer(&[format!("{ISSUER_PREFIX}{project_id}")]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

        let token_data = decode::<FirebaseClaims>(token, &decoding_key, &validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::InvalidToken("token has expired".into()),
                ErrorKind::InvalidAudience => {
                    AuthError::InvalidToken(format!("audience is not '{project_id}'"))
                }
                ErrorKind::InvalidIssuer => AuthError::InvalidToken("invalid issuer".into()),
                _ => AuthError::InvalidToken(e.to_string()),
            },
        )?;

        let claims = token_data.claims;
        Self::check_subject(&claims.sub)?;

        let now = chrono::Utc::now().timestamp();
        if claims.iat > now + LEEWAY_SECS {
            return Err(AuthError::InvalidToken(
                "token issued in the future".to_string(),
            ));
        }
        if claims.auth_time.is_some_and(|t| t > now + LEEWAY_SECS) {
            return Err(AuthError::InvalidToken(
                "authentication time is in the future".to_string(),
            ));
        }

        Ok(claims)
    }

    fn check_subject(sub: &str) -> Result<(), AuthError> {
        if sub.is_empty() {
            return Err(AuthError::InvalidToken("empty subject".to_string()));
        }
        if sub.len() > MAX_UID_LEN {
            return Err(AuthError::InvalidToken(format!(
                "subject longer than {MAX_UID_LEN} characters"
            )));
        }
        Ok(())
    }

    async fn check_revoked(&self, claims: &FirebaseClaims) -> Result<(), AuthError> {
        let account = self.admin.lookup(&claims.sub).await.map_err(|e| match e {
            AuthError::UserNotFound(uid) => {
                AuthError::InvalidToken(format!("no account for uid {uid}"))
            }
            other => other,
        })?;

        if account.disabled {
            return Err(AuthError::UserDisabled);
        }
        if account.valid_since().is_some_and(|since| claims.iat < since) {
            log::info!("Rejected revoked token for {}", claims.sub);
            return Err(AuthError::Revoked);
        }
        Ok(())
    }

    /// Find a key by `kid`, fetching/refreshing the cache as needed.
    async fn find_key(&self, kid: &str) -> Result<Jwk, AuthError> {
        if let Some(key) = self.lookup_cached(kid) {
            return Ok(key);
        }

        if self.http_client.is_some() {
            self.refresh_keys().await?;
            if let Some(key) = self.lookup_cached(kid) {
                return Ok(key);
            }
        }

        Err(AuthError::NoMatchingKey(kid.to_string()))
    }

    fn lookup_cached(&self, kid: &str) -> Option<Jwk> {
        let cache = self.cached.read().ok()?;
        let cached = cache.as_ref()?;

        if self.http_client.is_some() && cached.fetched_at.elapsed() > JWKS_CACHE_TTL {
            return None;
        }

        cached.keys.iter().find(|k| k.kid == kid).cloned()
    }

    async fn refresh_keys(&self) -> Result<(), AuthError> {
        let client = self
            .http_client
            .as_ref()
            .ok_or_else(|| AuthError::KeyFetch("no HTTP client (static keys mode)".to_string()))?;

        log::debug!("Fetching signing keys from {}", self.jwks_url);
        let response: JwksResponse = client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?
            .error_for_status()
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?
            .json()
            .await
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?;

        let mut cache = self
            .cached
            .write()
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?;

        *cache = Some(CachedKeys {
            keys: response.keys,
            fetched_at: Instant::now(),
        });

        Ok(())
    }
}

impl TokenVerifier for FirebaseTokenVerifier {
    fn verify<'a>(&'a self, token: &'a str, check_revocation: bool) -> AuthFuture<'a, ClaimSet> {
        Box::pin(self.verify_token(token, check_revocation))
    }
}
