use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Extension, Path};
use axum::http::{header, HeaderValue};
use axum::response::Response;

use crate::{error::ApiError, state::AppState};

/// Serve raw artifact bytes for direct consumption by printer firmware.
pub async fn serve(
    Extension(state): Extension<Arc<AppState>>,
    Path(path): Path<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let code = path
        .get("code")
        .ok_or_else(|| ApiError::not_found("artifact code missing"))?;

    let bytes = state
        .service
        .artifacts()
        .read(code)?
        .ok_or_else(|| ApiError::not_found(format!("artifact {code} not found")))?;

    let mut response = Response::new(Body::from(bytes));
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/octet-stream"),
    );
    Ok(response)
}
