use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Extension, Json, Path};
use serde::Deserialize;
use serde_json::Value;

use printhub_queue::Direction;

use crate::{error::ApiError, handlers::utils::path_uuid, state::AppState};

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub direction: Direction,
}

pub async fn reorder(
    Extension(state): Extension<Arc<AppState>>,
    Path(path): Path<HashMap<String, String>>,
    Json(payload): Json<ReorderRequest>,
) -> Result<Json<Value>, ApiError> {
    let job_id = path_uuid(&path, "jobId")?;
    state.service.reorder(job_id, payload.direction).await?;
    Ok(Json(serde_json::json!({
        "reordered": job_id,
        "direction": payload.direction,
    })))
}
