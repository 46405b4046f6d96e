use std::sync::Arc;

use axum::extract::{Extension, Json};
use serde_json::Value;

use crate::{error::ApiError, state::AppState};

pub async fn list(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Value>, ApiError> {
    let workers = state.service.list_workers().await?;
    Ok(Json(serde_json::json!({ "workers": workers })))
}
