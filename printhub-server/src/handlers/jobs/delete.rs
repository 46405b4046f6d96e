use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Extension, Json, Path};
use axum::http::HeaderMap;
use serde_json::Value;

use crate::{
    error::ApiError,
    handlers::utils::{path_uuid, require_owner},
    state::AppState,
};

pub async fn delete(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Path(path): Path<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let owner = require_owner(&headers)?;
    let job_id = path_uuid(&path, "jobId")?;
    state.service.delete_job(owner, job_id).await?;
    Ok(Json(serde_json::json!({ "deleted": job_id })))
}
