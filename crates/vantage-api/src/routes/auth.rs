//! Sign-up, sign-in and the caller's own identity.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Serialize;
use serde_json::{json, Value};
use vantage_acl::{SignUpRequest, SignedUp};
use vantage_core::{ClaimSet, Role};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Response to a successful sign-in.
#[derive(Debug, Serialize)]
pub struct SignInResponse {
    status: &'static str,
    message: String,
    role: Role,
    created: bool,
}

pub(super) async fn sign_up(
    State(state): State<AppState>,
    body: Result<Json<SignUpRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SignedUp>)> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let signed_up = state.signup.sign_up(request).await?;
    tracing::info!(uid = %signed_up.uid, "Account signed up");
    Ok((StatusCode::CREATED, Json(signed_up)))
}

pub(super) async fn sign_in(
    State(state): State<AppState>,
    Extension(claims): Extension<ClaimSet>,
) -> ApiResult<Json<SignInResponse>> {
    let reconciled = state.reconciler.reconcile(&claims).await?;
    tracing::info!(
        uid = %claims.uid,
        role = %reconciled.role,
        created = reconciled.created,
        "Sign-in reconciled"
    );
    Ok(Json(SignInResponse {
        status: "success",
        message: format!(
            "Custom claim '{}' set for user {}",
            reconciled.role, claims.uid
        ),
        role: reconciled.role,
        created: reconciled.created,
    }))
}

pub(super) async fn me(Extension(claims): Extension<ClaimSet>) -> Json<Value> {
    Json(json!({"uid": claims.uid, "email": claims.email}))
}
