use axum::{http::StatusCode, response::IntoResponse, Json};
use printhub_queue::QueueError;
use serde_json::json;
use thiserror::Error;

/// Top-level API error shared by all route handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("unprocessable: {0}")]
    Unprocessable(String),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl From<QueueError> for ApiError {
    fn from(err: QueueError) -> Self {
        match err {
            QueueError::JobNotFound(id) => Self::NotFound(format!("job {id} not found")),
            QueueError::WorkerNotFound(id) => Self::NotFound(format!("worker {id} not found")),
            QueueError::PermissionDenied => {
                Self::Forbidden("job belongs to another owner".to_string())
            }
            QueueError::ArtifactConflict(code) => {
                Self::Conflict(format!("artifact {code} is already in use"))
            }
            QueueError::WorkerNameConflict(name) => {
                Self::Conflict(format!("worker name {name} is already registered"))
            }
            QueueError::Conflict => Self::Conflict("queue is contended, retry".to_string()),
            QueueError::InvalidState(msg) => Self::Unprocessable(msg),
            QueueError::OutOfRange(end) => {
                Self::Unprocessable(format!("job is already at the {end} of the queue"))
            }
            QueueError::Io(e) => Self::Unexpected(e.to_string()),
            QueueError::Db(e) => Self::Unexpected(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = json!({ "error": self.to_string() });
        (status, Json(payload)).into_response()
    }
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }
}
