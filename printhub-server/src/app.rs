use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    extract::Extension,
    http::StatusCode,
    routing::{delete, get, post},
    Router,
};

use crate::{handlers, state::AppState};

// Default body limit: 64 MB (base64-encoded G-code can get large)
const DEFAULT_BODY_LIMIT: usize = 64 * 1024 * 1024;

/// Build the primary axum router with the provided shared application state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/jobs",
            post(handlers::jobs::submit::submit).get(handlers::jobs::list::list),
        )
        .route("/jobs/{jobId}", delete(handlers::jobs::delete::delete))
        .route(
            "/jobs/{jobId}/reorder",
            post(handlers::jobs::reorder::reorder),
        )
        .route(
            "/workers",
            post(handlers::workers::create::create).get(handlers::workers::list::list),
        )
        .route(
            "/workers/{workerId}/request-work",
            post(handlers::workers::request_work::request_work),
        )
        .route(
            "/workers/{workerId}/complete",
            post(handlers::workers::complete::complete),
        )
        .route("/artifacts/{code}", get(handlers::artifacts::serve::serve))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT))
        .layer(Extension(state))
}

async fn health_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}
