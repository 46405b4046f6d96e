//! Manual queue reordering over the queued subset.

use printhub_db::{queue, DbPool};
use uuid::Uuid;

use crate::error::QueueError;
use crate::types::Direction;

/// One reorder attempt inside a single transaction.
///
/// Up/down swap the stored positions with the immediate neighbor. Top and
/// bottom shift only the affected index range by one and then place the
/// job at the freed end, so the cost is O(rank), not a queue rewrite.
/// Positions read and written here are the stored values; the dense 1..N
/// permutation holds again by commit time.
pub(crate) async fn reorder_once(
    pool: &DbPool,
    job_id: Uuid,
    direction: Direction,
) -> Result<(), QueueError> {
    let mut tx = pool.begin().await?;

    let job = queue::find_by_id(&mut *tx, &job_id)
        .await?
        .ok_or(QueueError::JobNotFound(job_id))?;
    if !job.is_queued() {
        return Err(QueueError::invalid_state(
            "only queued jobs can be reordered",
        ));
    }
    let position = job
        .queue_position
        .ok_or_else(|| QueueError::invalid_state("queued job carries no position"))?;
    let count = queue::count_queued(&mut *tx).await?;

    match direction {
        Direction::Up => {
            if position <= 1 {
                return Err(QueueError::OutOfRange("front"));
            }
            let neighbor = queue::find_queued_at_position(&mut *tx, position - 1)
                .await?
                .ok_or_else(|| QueueError::invalid_state("queue ordering is not dense"))?;
            queue::set_position(&mut *tx, &neighbor.id, position).await?;
            queue::set_position(&mut *tx, &job.id, position - 1).await?;
        }
        Direction::Down => {
            if position >= count {
                return Err(QueueError::OutOfRange("back"));
            }
            let neighbor = queue::find_queued_at_position(&mut *tx, position + 1)
                .await?
                .ok_or_else(|| QueueError::invalid_state("queue ordering is not dense"))?;
            queue::set_position(&mut *tx, &neighbor.id, position).await?;
            queue::set_position(&mut *tx, &job.id, position + 1).await?;
        }
        Direction::Top => {
            if position > 1 {
                queue::shift_up_before(&mut *tx, position).await?;
                queue::set_position(&mut *tx, &job.id, 1).await?;
            }
        }
        Direction::Bottom => {
            if position < count {
                queue::shift_down_after(&mut *tx, position).await?;
                queue::set_position(&mut *tx, &job.id, count).await?;
            }
        }
    }

    tx.commit().await?;
    tracing::debug!(job = %job_id, direction = %direction, "queue reordered");
    Ok(())
}
