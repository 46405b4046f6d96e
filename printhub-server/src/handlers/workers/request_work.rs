use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Extension, Json, Path};
use serde_json::Value;

use crate::{error::ApiError, handlers::utils::path_uuid, state::AppState};

/// Hand the calling printer the next eligible job, if any. An empty queue
/// is a normal outcome and answers `{"job": null}`.
pub async fn request_work(
    Extension(state): Extension<Arc<AppState>>,
    Path(path): Path<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let worker_id = path_uuid(&path, "workerId")?;
    let dispatch = state.service.request_work(worker_id).await?;
    match dispatch {
        Some(d) => Ok(Json(serde_json::json!({
            "job": {
                "id": d.job_id,
                "title": d.title,
                "artifact": format!("/artifacts/{}", d.code),
            }
        }))),
        None => Ok(Json(serde_json::json!({ "job": null }))),
    }
}
