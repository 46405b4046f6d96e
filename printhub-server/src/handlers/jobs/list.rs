use std::sync::Arc;

use axum::extract::{Extension, Json};
use serde_json::Value;

use crate::{error::ApiError, state::AppState};

/// Full job listing in display order: queued first by position, then
/// printing, then completed.
pub async fn list(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Value>, ApiError> {
    let jobs = state.service.list_jobs().await?;
    Ok(Json(serde_json::json!({ "jobs": jobs })))
}
