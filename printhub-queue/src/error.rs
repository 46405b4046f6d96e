use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by queue operations.
///
/// Empty outcomes (no eligible job for a worker, nothing to complete) are
/// not errors; they come back as `Ok` values from the service.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("job {0} not found")]
    JobNotFound(Uuid),
    #[error("worker {0} not found")]
    WorkerNotFound(Uuid),
    #[error("permission denied")]
    PermissionDenied,
    #[error("artifact '{0}' is already used by a live job")]
    ArtifactConflict(String),
    #[error("worker name '{0}' is already registered")]
    WorkerNameConflict(String),
    #[error("queue write conflict: transaction retries exhausted")]
    Conflict,
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("job is already at the {0} of the queue")]
    OutOfRange(&'static str),
    #[error("artifact io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

impl QueueError {
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }
}
