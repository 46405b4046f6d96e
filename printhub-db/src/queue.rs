//! Query primitives for the job queue.
//!
//! Everything here takes an [`sqlx::Executor`] so callers can run several
//! primitives inside one transaction. Ordering is governed solely by the
//! stored `queue_position` column: queued positions always form a dense
//! 1..N permutation, and the shift primitives below are the only way the
//! service layer moves them.

use sqlx::Executor;
use uuid::Uuid;

use crate::rows::{JobRow, JobStatus};
use crate::DbBackend;

const JOB_COLUMNS: &str = "id, upload_id, group_id, queue_position, title, code, color, material, \
     date_posted, date_print_start, date_print_finish, qty, comment, status, printer_id, owner_id";

pub async fn insert_job<'e, E>(executor: E, row: &JobRow) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    sqlx::query(
        "INSERT INTO jobs (id, upload_id, group_id, queue_position, title, code, color, material, \
         date_posted, date_print_start, date_print_finish, qty, comment, status, printer_id, owner_id) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(row.id)
    .bind(row.upload_id)
    .bind(row.group_id)
    .bind(row.queue_position)
    .bind(&row.title)
    .bind(&row.code)
    .bind(&row.color)
    .bind(&row.material)
    .bind(&row.date_posted)
    .bind(&row.date_print_start)
    .bind(&row.date_print_finish)
    .bind(row.qty)
    .bind(&row.comment)
    .bind(&row.status)
    .bind(row.printer_id)
    .bind(row.owner_id)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn find_by_id<'e, E>(executor: E, id: &Uuid) -> Result<Option<JobRow>, sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    sqlx::query_as::<_, JobRow>(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = ?"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Number of jobs currently in the queue; the tail position is this plus one.
pub async fn count_queued<'e, E>(executor: E) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    sqlx::query_scalar("SELECT COUNT(*) FROM jobs WHERE status = ?")
        .bind(JobStatus::Queue.as_str())
        .fetch_one(executor)
        .await
}

/// The lowest-position queued job exactly matching the worker's filament.
pub async fn find_head_eligible<'e, E>(
    executor: E,
    color: &str,
    material: &str,
) -> Result<Option<JobRow>, sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    sqlx::query_as::<_, JobRow>(&format!(
        "SELECT {JOB_COLUMNS} FROM jobs \
         WHERE status = ? AND color = ? AND material = ? \
         ORDER BY queue_position ASC LIMIT 1"
    ))
    .bind(JobStatus::Queue.as_str())
    .bind(color)
    .bind(material)
    .fetch_optional(executor)
    .await
}

pub async fn find_queued_at_position<'e, E>(
    executor: E,
    position: i64,
) -> Result<Option<JobRow>, sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    sqlx::query_as::<_, JobRow>(&format!(
        "SELECT {JOB_COLUMNS} FROM jobs WHERE status = ? AND queue_position = ?"
    ))
    .bind(JobStatus::Queue.as_str())
    .bind(position)
    .fetch_optional(executor)
    .await
}

/// Queued jobs in queue order.
pub async fn list_queued<'e, E>(executor: E) -> Result<Vec<JobRow>, sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    sqlx::query_as::<_, JobRow>(&format!(
        "SELECT {JOB_COLUMNS} FROM jobs WHERE status = ? ORDER BY queue_position ASC"
    ))
    .bind(JobStatus::Queue.as_str())
    .fetch_all(executor)
    .await
}

/// All jobs for display: queued first in queue order, then printing and
/// completed by submission date.
pub async fn list_all<'e, E>(executor: E) -> Result<Vec<JobRow>, sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    sqlx::query_as::<_, JobRow>(&format!(
        "SELECT {JOB_COLUMNS} FROM jobs \
         ORDER BY CASE status WHEN 'queue' THEN 0 WHEN 'printing' THEN 1 ELSE 2 END, \
         queue_position ASC, date_posted ASC"
    ))
    .fetch_all(executor)
    .await
}

/// Distinct artifact filenames still referenced by a queued or printing job.
pub async fn live_codes<'e, E>(executor: E) -> Result<Vec<String>, sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    sqlx::query_scalar("SELECT DISTINCT code FROM jobs WHERE status = ? OR status = ?")
        .bind(JobStatus::Queue.as_str())
        .bind(JobStatus::Printing.as_str())
        .fetch_all(executor)
        .await
}

/// Whether any queued or printing job references the artifact filename.
pub async fn code_in_use<'e, E>(executor: E, code: &str) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM jobs WHERE code = ? AND (status = ? OR status = ?)")
            .bind(code)
            .bind(JobStatus::Queue.as_str())
            .bind(JobStatus::Printing.as_str())
            .fetch_one(executor)
            .await?;
    Ok(count > 0)
}

/// Compaction shift: every queued job behind `position` moves one slot
/// forward. Shared by deletion, full dispatch, and move-to-bottom.
pub async fn shift_down_after<'e, E>(executor: E, position: i64) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    let result = sqlx::query(
        "UPDATE jobs SET queue_position = queue_position - 1 \
         WHERE status = ? AND queue_position > ?",
    )
    .bind(JobStatus::Queue.as_str())
    .bind(position)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

/// Range shift for move-to-top: every queued job ahead of `position` moves
/// one slot back, freeing position 1.
pub async fn shift_up_before<'e, E>(executor: E, position: i64) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    let result = sqlx::query(
        "UPDATE jobs SET queue_position = queue_position + 1 \
         WHERE status = ? AND queue_position < ?",
    )
    .bind(JobStatus::Queue.as_str())
    .bind(position)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

pub async fn set_position<'e, E>(executor: E, id: &Uuid, position: i64) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    sqlx::query("UPDATE jobs SET queue_position = ? WHERE id = ?")
        .bind(position)
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}

/// Takes one unit off a multi-quantity job. Guarded so it can never drive
/// `qty` below one; returns false if the guard rejected the decrement.
pub async fn decrement_qty<'e, E>(executor: E, id: &Uuid) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    let result = sqlx::query("UPDATE jobs SET qty = qty - 1 WHERE id = ? AND qty > 1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() == 1)
}

/// In-place transition to printing: stamps the start date and printer,
/// clears the stored position.
pub async fn mark_printing<'e, E>(
    executor: E,
    id: &Uuid,
    printer_id: &Uuid,
    started_at: &str,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    sqlx::query(
        "UPDATE jobs SET status = ?, printer_id = ?, date_print_start = ?, queue_position = NULL \
         WHERE id = ?",
    )
    .bind(JobStatus::Printing.as_str())
    .bind(printer_id)
    .bind(started_at)
    .bind(id)
    .execute(executor)
    .await?;
    Ok(())
}

/// Transitions every printing job held by the worker to completed,
/// stamping the finish date. Returns how many jobs were completed.
pub async fn complete_all_for_worker<'e, E>(
    executor: E,
    printer_id: &Uuid,
    finished_at: &str,
) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    let result = sqlx::query(
        "UPDATE jobs SET status = ?, date_print_finish = ? \
         WHERE printer_id = ? AND status = ?",
    )
    .bind(JobStatus::Completed.as_str())
    .bind(finished_at)
    .bind(printer_id)
    .bind(JobStatus::Printing.as_str())
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete_by_id<'e, E>(executor: E, id: &Uuid) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    let result = sqlx::query("DELETE FROM jobs WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
