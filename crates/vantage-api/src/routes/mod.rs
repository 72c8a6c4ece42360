//! Route table.
//!
//! | Route | Authentication |
//! |---|---|
//! | `GET /`, `GET /health`, `POST /api/v1/auth/signup` | none |
//! | `POST /api/v1/auth/google-signin`, `POST /api/v1/auth/signin` | bearer token |
//! | every other `/api` route | bearer token, revocation checked |
//!
//! Role checks happen inside the resource handlers through [`Policy`](crate::policy::Policy).

mod auth;
mod memos;
mod startups;

use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use vantage_auth::{AuthConfig, AuthLayer};

use crate::config::{ConfigError, CorsConfig};
use crate::state::AppState;

/// Collection holding startup submissions.
pub const STARTUPS: &str = "startups";

/// Collection holding investment memos.
pub const MEMOS: &str = "memos";

/// Build the application router.
pub fn router(state: AppState, cors: &CorsConfig) -> Result<Router, ConfigError> {
    let sign_in = Router::new()
        .route("/api/v1/auth/google-signin", post(auth::sign_in))
        .route("/api/v1/auth/signin", post(auth::sign_in))
        .route_layer(AuthLayer::new(
            state.verifier.clone(),
            AuthConfig {
                check_revocation: false,
            },
        ));

    let protected = Router::new()
        .route("/api/me", get(auth::me))
        .route(
            "/api/startups",
            get(startups::list).post(startups::create),
        )
        .route("/api/startups/{id}", get(startups::get))
        .route("/api/founder/dashboard", get(startups::dashboard))
        .route("/api/memos/{id}", get(memos::get))
        .route_layer(AuthLayer::new(
            state.verifier.clone(),
            AuthConfig {
                check_revocation: true,
            },
        ));

    let router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/v1/auth/signup", post(auth::sign_up))
        .merge(sign_in)
        .merge(protected)
        .layer(cors_layer(cors)?)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(router)
}

/// CORS policy: any origin unless origins are listed.
pub fn cors_layer(cors: &CorsConfig) -> Result<CorsLayer, ConfigError> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    Ok(match cors.header_values()? {
        None => layer.allow_origin(Any),
        Some(origins) => layer.allow_origin(AllowOrigin::list(origins)),
    })
}

async fn root() -> Json<Value> {
    Json(json!({"message": "Welcome to the backend! API is running."}))
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}
