use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Extension, Json, Path};
use serde_json::Value;

use crate::{error::ApiError, handlers::utils::path_uuid, state::AppState};

/// Mark everything the calling printer accumulated as completed. Reporting
/// with nothing in flight answers `{"completed": 0}` rather than an error.
pub async fn complete(
    Extension(state): Extension<Arc<AppState>>,
    Path(path): Path<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let worker_id = path_uuid(&path, "workerId")?;
    let completed = state.service.report_complete(worker_id).await?;
    Ok(Json(serde_json::json!({ "completed": completed })))
}
