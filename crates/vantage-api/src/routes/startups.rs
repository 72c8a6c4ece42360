//! Startup submissions and the founder dashboard.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use vantage_acl::ensure_owner;
use vantage_core::ClaimSet;
use vantage_storage::Document;

use super::STARTUPS;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// A startup submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStartup {
    name: String,
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    website: Option<String>,
    founder_uid: String,
}

pub(super) async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<ClaimSet>,
) -> ApiResult<Json<Vec<Value>>> {
    state.policy.investor_or_admin.authorize(&claims).await?;
    let startups = state.documents.list(STARTUPS).await?;
    Ok(Json(startups.into_iter().map(Document::into_json).collect()))
}

pub(super) async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<ClaimSet>,
    body: Result<Json<NewStartup>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let profile = state.policy.founder.authorize(&claims).await?;
    let Json(startup) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    ensure_owner(&profile, &startup.founder_uid)?;

    let data = startup_fields(&startup)?;
    let document = state.documents.add(STARTUPS, data).await?;
    tracing::info!(id = %document.id, founder_uid = %startup.founder_uid, "Startup submitted");
    Ok((StatusCode::CREATED, Json(document.into_json())))
}

fn startup_fields(startup: &NewStartup) -> ApiResult<Map<String, Value>> {
    match serde_json::to_value(startup)? {
        Value::Object(map) => Ok(map),
        other => Err(ApiError::Encode(serde::ser::Error::custom(format!(
            "expected an object, got {other}"
        )))),
    }
}

pub(super) async fn get(
    State(state): State<AppState>,
    Extension(claims): Extension<ClaimSet>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.policy.investor_or_admin.authorize(&claims).await?;
    state
        .documents
        .get(STARTUPS, &id)
        .await?
        .map(|doc| Json(doc.into_json()))
        .ok_or(ApiError::NotFound("Startup not found."))
}

pub(super) async fn dashboard(
    State(state): State<AppState>,
    Extension(claims): Extension<ClaimSet>,
) -> ApiResult<Json<Value>> {
    let profile = state.policy.founder.authorize(&claims).await?;
    let startup = state
        .documents
        .find_by_field(STARTUPS, "founder_uid", &Value::String(profile.uid), 1)
        .await?
        .into_iter()
        .next()
        .map(Document::into_json);

    Ok(Json(json!({
        "startup": startup,
        "memos": [],
        "investor_interest": [],
    })))
}
