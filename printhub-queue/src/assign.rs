//! Dispatch: match a polling worker to the best eligible queued job.

use chrono::Utc;
use printhub_db::rows::{JobRow, JobStatus, WorkerStatus};
use printhub_db::{queue, workers, DbPool};
use uuid::Uuid;

use crate::error::QueueError;
use crate::types::Dispatch;

/// One dispatch attempt inside a single transaction.
///
/// Eligibility is an exact color+material match; among eligible queued jobs
/// the lowest position wins. A job with qty > 1 keeps its place in the
/// queue and sheds a single-unit printing sibling; a job with qty == 1
/// transitions in place and its slot is compacted away. `Ok(None)` means
/// no eligible work, which is a valid outcome.
pub(crate) async fn dispatch_once(
    pool: &DbPool,
    worker_id: Uuid,
) -> Result<Option<Dispatch>, QueueError> {
    let mut tx = pool.begin().await?;

    let worker = workers::find_by_id(&mut *tx, &worker_id)
        .await?
        .ok_or(QueueError::WorkerNotFound(worker_id))?;

    let Some(job) = queue::find_head_eligible(&mut *tx, &worker.color, &worker.material).await?
    else {
        // Read-only so far; dropping the transaction rolls it back.
        return Ok(None);
    };

    let started_at = Utc::now().to_rfc3339();
    let dispatched_id = if job.qty > 1 {
        // Split: the original stays queued at its position with one unit
        // less, and a single-unit printing sibling materializes.
        if !queue::decrement_qty(&mut *tx, &job.id).await? {
            return Err(QueueError::invalid_state(
                "job quantity changed during dispatch",
            ));
        }
        let sibling = JobRow {
            id: Uuid::new_v4(),
            upload_id: job.upload_id,
            group_id: job.group_id,
            queue_position: None,
            title: job.title.clone(),
            code: job.code.clone(),
            color: job.color.clone(),
            material: job.material.clone(),
            date_posted: job.date_posted.clone(),
            date_print_start: Some(started_at.clone()),
            date_print_finish: None,
            qty: 1,
            comment: job.comment.clone(),
            status: JobStatus::Printing.as_str().to_string(),
            printer_id: Some(worker.id),
            owner_id: job.owner_id,
        };
        queue::insert_job(&mut *tx, &sibling).await?;
        sibling.id
    } else {
        // Last unit: transition in place and close the gap it leaves.
        let position = job
            .queue_position
            .ok_or_else(|| QueueError::invalid_state("queued job carries no position"))?;
        queue::mark_printing(&mut *tx, &job.id, &worker.id, &started_at).await?;
        queue::shift_down_after(&mut *tx, position).await?;
        job.id
    };

    workers::set_status(&mut *tx, &worker.id, WorkerStatus::Printing).await?;
    tx.commit().await?;

    tracing::info!(
        worker = %worker.id,
        job = %dispatched_id,
        code = %job.code,
        "dispatched job to worker"
    );

    Ok(Some(Dispatch {
        job_id: dispatched_id,
        title: job.title,
        code: job.code,
    }))
}
