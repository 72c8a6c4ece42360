//! Common test utilities for vantage-api integration tests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;
use vantage_api::config::CorsConfig;
use vantage_api::seed;
use vantage_api::{Backend, Backends, Config};
use vantage_auth::{IdentityProvider, MemoryIdentityProvider, NewAccount};
use vantage_core::ProfileDocument;
use vantage_storage::{DocumentStore, ProfileStore};

/// A response, decoded.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// The `detail` field of an error body.
    pub fn detail(&self) -> &str {
        self.body["detail"].as_str().unwrap_or_default()
    }

    /// The `error.category` field of an error body.
    pub fn category(&self) -> &str {
        self.body["error"]["category"].as_str().unwrap_or_default()
    }
}

/// The router over a fresh memory backend.
pub struct TestApp {
    pub router: Router,
    pub backends: Backends,
    pub provider: Arc<MemoryIdentityProvider>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_cors(CorsConfig::default())
    }

    pub fn with_cors(cors: CorsConfig) -> Self {
        let backends = Backends::memory();
        let config = Config {
            backend: Backend::Memory,
            cors,
            ..Config::default()
        };
        let router = vantage_api::app(&backends, &config).unwrap();
        let provider = backends.memory.clone().unwrap();
        Self {
            router,
            backends,
            provider,
        }
    }

    /// A fresh app with the demo accounts in place.
    pub async fn seeded() -> Self {
        let app = Self::new();
        let report = seed::seed(
            app.backends.identity.as_ref(),
            app.backends.profiles().as_ref(),
        )
        .await;
        assert!(report.is_complete());
        app
    }

    /// A current bearer token for `uid`.
    pub fn token(&self, uid: &str) -> String {
        self.provider.issue_token(uid).unwrap()
    }

    /// Create an identity record with no profile, returning its uid.
    pub async fn account(&self, email: &str) -> String {
        self.provider
            .create_account(NewAccount {
                email: email.to_string(),
                password: "password".to_string(),
                ..Default::default()
            })
            .await
            .unwrap()
    }

    pub async fn profile(&self, uid: &str) -> Option<ProfileDocument> {
        self.backends.profiles().get(uid).await.unwrap()
    }

    pub async fn put_profile(&self, profile: &ProfileDocument) {
        self.backends.profiles().set(profile).await.unwrap();
    }

    /// Write a raw document.
    pub async fn put_document(&self, collection: &str, id: &str, data: Value) {
        self.backends
            .documents
            .set(collection, id, data.as_object().cloned().unwrap_or_default())
            .await
            .unwrap();
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::GET, path, token, None).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::POST, path, token, Some(body.to_string()))
            .await
    }

    /// Send a request with an optional raw JSON body.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<String>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body)),
            None => builder.body(Body::empty()),
        }
        .unwrap();
        self.call(request).await
    }

    pub async fn call(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
