//! Investment memos.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde_json::Value;
use vantage_core::ClaimSet;

use super::MEMOS;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub(super) async fn get(
    State(state): State<AppState>,
    Extension(claims): Extension<ClaimSet>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.policy.investor_or_admin.authorize(&claims).await?;
    let memo = state.documents.get(MEMOS, &id).await?;
    memo.map(|doc| Json(doc.into_json()))
        .ok_or(ApiError::NotFound("Memo not found."))
}
