use std::sync::Arc;

use axum::extract::{Extension, Json};
use axum::http::HeaderMap;
use serde::Deserialize;
use serde_json::Value;

use printhub_queue::NewWorker;

use crate::{error::ApiError, handlers::utils::require_owner, state::AppState};

#[derive(Debug, Deserialize)]
pub struct CreateWorkerRequest {
    pub name: String,
    pub color: String,
    pub material: String,
}

pub async fn create(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<CreateWorkerRequest>,
) -> Result<Json<Value>, ApiError> {
    let owner = require_owner(&headers)?;
    let worker = state
        .service
        .create_worker(
            owner,
            NewWorker {
                name: payload.name,
                color: payload.color,
                material: payload.material,
            },
        )
        .await?;
    Ok(Json(
        serde_json::to_value(&worker).map_err(|e| ApiError::Unexpected(e.to_string()))?,
    ))
}
