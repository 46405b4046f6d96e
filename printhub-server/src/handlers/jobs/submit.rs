use std::sync::Arc;

use axum::extract::{Extension, Json};
use axum::http::HeaderMap;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use printhub_queue::NewJob;

use crate::{error::ApiError, handlers::utils::require_owner, state::AppState};

#[derive(Debug, Deserialize)]
pub struct SubmitJobRequest {
    pub title: String,
    pub color: String,
    pub material: String,
    #[serde(default = "default_qty")]
    pub qty: i64,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub group_id: Option<Uuid>,
    pub filename: String,
    pub content_base64: String,
    #[serde(default)]
    pub overwrite: bool,
}

fn default_qty() -> i64 {
    1
}

pub async fn submit(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<SubmitJobRequest>,
) -> Result<Json<Value>, ApiError> {
    let owner = require_owner(&headers)?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.content_base64.as_bytes())
        .map_err(|_| ApiError::bad_request("content_base64 is not valid base64"))?;

    let job = state
        .service
        .submit_job(
            owner,
            NewJob {
                title: payload.title,
                color: payload.color,
                material: payload.material,
                qty: payload.qty,
                comment: payload.comment,
                group_id: payload.group_id,
                filename: payload.filename,
                bytes,
                overwrite: payload.overwrite,
            },
        )
        .await?;

    Ok(Json(
        serde_json::to_value(&job).map_err(|e| ApiError::Unexpected(e.to_string()))?,
    ))
}
