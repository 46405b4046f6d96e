//! Completion: drain a worker's printing jobs and free the worker.

use chrono::Utc;
use printhub_db::rows::WorkerStatus;
use printhub_db::{queue, workers, DbPool};
use uuid::Uuid;

use crate::error::QueueError;

/// One completion attempt inside a single transaction.
///
/// A worker may have accumulated several single-unit printing jobs through
/// split dispatches; every one of them transitions to completed with the
/// same finish stamp, and the worker becomes available exactly once.
/// Returns the number of jobs completed; zero means there was nothing to
/// complete and state is left untouched.
pub(crate) async fn complete_once(pool: &DbPool, worker_id: Uuid) -> Result<u64, QueueError> {
    let mut tx = pool.begin().await?;

    let worker = workers::find_by_id(&mut *tx, &worker_id)
        .await?
        .ok_or(QueueError::WorkerNotFound(worker_id))?;

    let finished_at = Utc::now().to_rfc3339();
    let completed = queue::complete_all_for_worker(&mut *tx, &worker.id, &finished_at).await?;
    if completed == 0 {
        // Nothing to complete; dropping the transaction rolls it back.
        return Ok(0);
    }

    workers::set_status(&mut *tx, &worker.id, WorkerStatus::Available).await?;
    tx.commit().await?;

    tracing::info!(worker = %worker.id, completed, "worker reported completion");
    Ok(completed)
}
