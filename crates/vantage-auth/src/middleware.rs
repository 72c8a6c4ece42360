//! Bearer-token Tower middleware.
//!
//! `AuthLayer` and `AuthService` wrap any inner service with token verification.
//! Generic over `TokenVerifier`; plug in any identity provider.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::response::IntoResponse;
use http::{Request, StatusCode};
use tower::{Layer, Service};
use vantage_core::ClaimSet;

use crate::{AuthConfig, AuthError, TokenVerifier};

/// Tower `Layer` that wraps services with token verification.
pub struct AuthLayer<V: TokenVerifier + ?Sized> {
    verifier: Arc<V>,
    config: AuthConfig,
}

impl<V: TokenVerifier + ?Sized> AuthLayer<V> {
    /// Create a new auth layer with the given verifier and config.
    pub fn new(verifier: Arc<V>, config: AuthConfig) -> Self {
        Self { verifier, config }
    }
}

impl<V: TokenVerifier + ?Sized> Clone for AuthLayer<V> {
    fn clone(&self) -> Self {
        Self {
            verifier: self.verifier.clone(),
            config: self.config.clone(),
        }
    }
}

impl<V: TokenVerifier + ?Sized, S> Layer<S> for AuthLayer<V> {
    type Service = AuthService<V, S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            verifier: self.verifier.clone(),
            config: self.config.clone(),
        }
    }
}

/// Tower `Service` that verifies tokens before forwarding requests.
///
/// On success, inserts the [`ClaimSet`] into request extensions where it's
/// available to downstream handlers.
pub struct AuthService<V: TokenVerifier + ?Sized, S> {
    inner: S,
    verifier: Arc<V>,
    config: AuthConfig,
}

impl<V: TokenVerifier + ?Sized, S: Clone> Clone for AuthService<V, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            verifier: self.verifier.clone(),
            config: self.config.clone(),
        }
    }
}

impl<V, S> Service<Request<Body>> for AuthService<V, S>
where
    V: TokenVerifier + ?Sized,
    S: Service<Request<Body>, Error = Infallible> + Clone + Send + 'static,
    S::Response: IntoResponse,
    S::Future: Send,
{
    type Response = axum::response::Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let verifier = self.verifier.clone();
        let check_revocation = self.config.check_revocation;

        Box::pin(async move {
            let token = match extract_bearer_token(&req) {
                Some(t) => t.to_string(),
                None => return Ok(failure_response(&AuthError::MissingToken)),
            };

            match verifier.verify(&token, check_revocation).await {
                Ok(claims) => {
                    log::debug!("Verified token for uid {}", claims.uid);
                    req.extensions_mut().insert(claims);
                    let resp = inner
                        .call(req)
                        .await
                        .unwrap_or_else(|infallible| match infallible {});
                    Ok(resp.into_response())
                }
                Err(auth_err) => {
                    log::warn!("Authentication failed: {auth_err}");
                    Ok(failure_response(&auth_err))
                }
            }
        })
    }
}

/// Extract the verified [`ClaimSet`] from HTTP request `Parts`, if present.
pub fn claims_from_parts(parts: &http::request::Parts) -> Option<&ClaimSet> {
    parts.extensions.get::<ClaimSet>()
}

/// Extract bearer token from the Authorization header.
fn extract_bearer_token(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Build the response for a failed verification.
///
/// Client errors become 401 with a `WWW-Authenticate` header; provider
/// failures become 500.
fn failure_response(err: &AuthError) -> axum::response::Response {
    let (status, category) = if err.is_client_error() {
        (StatusCode::UNAUTHORIZED, "authentication")
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, "dependency")
    };
    let message = err.to_string();
    let body = serde_json::json!({
        "error": {
            "category": category,
            "message": message,
        },
        "detail": message,
    });

    let mut response = (
        status,
        [(http::header::CONTENT_TYPE, "application/json")],
        serde_json::to_string(&body).unwrap_or_default(),
    )
        .into_response();

    if status == StatusCode::UNAUTHORIZED {
        response.headers_mut().insert(
            http::header::WWW_AUTHENTICATE,
            http::HeaderValue::from_static("Bearer"),
        );
    }

    response
}
