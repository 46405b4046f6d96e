//! The queue service facade.

use std::collections::HashSet;

use chrono::Utc;
use printhub_db::rows::{JobRow, JobStatus, WorkerRow, WorkerStatus};
use printhub_db::{queue, workers, DbPool};
use uuid::Uuid;

use crate::assign;
use crate::complete;
use crate::error::QueueError;
use crate::gc::{self, ArtifactStore};
use crate::reorder;
use crate::retry::with_retry;
use crate::types::{Direction, Dispatch, NewJob, NewWorker};

/// Facade over the queue store and the artifact directory. Cheap to clone;
/// the pool is the shared handle.
#[derive(Debug, Clone)]
pub struct QueueService {
    pool: DbPool,
    artifacts: ArtifactStore,
}

impl QueueService {
    pub fn new(pool: DbPool, artifacts: ArtifactStore) -> Self {
        Self { pool, artifacts }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    /// Submit a job: write the artifact, then enqueue at the tail.
    ///
    /// The artifact filename must be unique among live jobs unless the
    /// caller explicitly asked to overwrite. The file hits disk before the
    /// job row commits, so the GC sweep can never collect the artifact of
    /// a job that made it into the queue.
    pub async fn submit_job(&self, owner: Uuid, new_job: NewJob) -> Result<JobRow, QueueError> {
        if new_job.qty < 1 {
            return Err(QueueError::invalid_state(format!(
                "qty must be at least 1, got {}",
                new_job.qty
            )));
        }
        if !gc::is_valid_code(&new_job.filename) {
            return Err(QueueError::invalid_state(format!(
                "invalid artifact filename '{}'",
                new_job.filename
            )));
        }
        let row = with_retry("submit_job", || self.submit_once(owner, &new_job)).await?;
        tracing::info!(
            job = %row.id,
            owner = %owner,
            code = %row.code,
            qty = row.qty,
            position = ?row.queue_position,
            "job submitted"
        );
        Ok(row)
    }

    async fn submit_once(&self, owner: Uuid, new_job: &NewJob) -> Result<JobRow, QueueError> {
        let mut tx = self.pool.begin().await?;

        if !new_job.overwrite && queue::code_in_use(&mut *tx, &new_job.filename).await? {
            return Err(QueueError::ArtifactConflict(new_job.filename.clone()));
        }

        // Artifact write precedes the row commit (see doc above). A failed
        // commit leaves an unreferenced file that the next sweep removes.
        self.artifacts.store(&new_job.filename, &new_job.bytes)?;

        let position = queue::count_queued(&mut *tx).await? + 1;
        let row = JobRow {
            id: Uuid::new_v4(),
            upload_id: Uuid::new_v4(),
            group_id: new_job.group_id,
            queue_position: Some(position),
            title: new_job.title.clone(),
            code: new_job.filename.clone(),
            color: new_job.color.clone(),
            material: new_job.material.clone(),
            date_posted: Utc::now().to_rfc3339(),
            date_print_start: None,
            date_print_finish: None,
            qty: new_job.qty,
            comment: new_job.comment.clone(),
            status: JobStatus::Queue.as_str().to_string(),
            printer_id: None,
            owner_id: owner,
        };
        queue::insert_job(&mut *tx, &row).await?;
        tx.commit().await?;
        Ok(row)
    }

    /// Delete a queued job owned by the caller, compacting the positions
    /// behind it and sweeping artifacts afterwards.
    pub async fn delete_job(&self, owner: Uuid, job_id: Uuid) -> Result<(), QueueError> {
        with_retry("delete_job", || self.delete_once(owner, job_id)).await?;
        self.collect_garbage().await?;
        tracing::info!(job = %job_id, owner = %owner, "job deleted");
        Ok(())
    }

    async fn delete_once(&self, owner: Uuid, job_id: Uuid) -> Result<(), QueueError> {
        let mut tx = self.pool.begin().await?;

        let job = queue::find_by_id(&mut *tx, &job_id)
            .await?
            .ok_or(QueueError::JobNotFound(job_id))?;
        if job.owner_id != owner {
            return Err(QueueError::PermissionDenied);
        }
        if !job.is_queued() {
            return Err(QueueError::invalid_state("only queued jobs can be deleted"));
        }
        let position = job
            .queue_position
            .ok_or_else(|| QueueError::invalid_state("queued job carries no position"))?;

        queue::delete_by_id(&mut *tx, &job_id).await?;
        queue::shift_down_after(&mut *tx, position).await?;
        tx.commit().await?;
        Ok(())
    }

    /// A worker polls for work. `Ok(None)` means no eligible job.
    pub async fn request_work(&self, worker_id: Uuid) -> Result<Option<Dispatch>, QueueError> {
        with_retry("request_work", || assign::dispatch_once(&self.pool, worker_id)).await
    }

    /// A worker reports its current work done. Returns how many printing
    /// jobs completed; zero means nothing was in flight.
    pub async fn report_complete(&self, worker_id: Uuid) -> Result<u64, QueueError> {
        let completed =
            with_retry("report_complete", || complete::complete_once(&self.pool, worker_id))
                .await?;
        if completed > 0 {
            self.collect_garbage().await?;
        }
        Ok(completed)
    }

    /// Manually reorder a queued job.
    pub async fn reorder(&self, job_id: Uuid, direction: Direction) -> Result<(), QueueError> {
        with_retry("reorder", || reorder::reorder_once(&self.pool, job_id, direction)).await
    }

    /// Register a printer with its fixed filament capability.
    pub async fn create_worker(&self, owner: Uuid, new: NewWorker) -> Result<WorkerRow, QueueError> {
        let row = WorkerRow {
            id: Uuid::new_v4(),
            name: new.name,
            color: new.color,
            material: new.material,
            status: WorkerStatus::Available.as_str().to_string(),
            owner_id: owner,
        };
        let mut conn = self.pool.acquire().await?;
        workers::insert_worker(&mut *conn, &row)
            .await
            .map_err(|err| {
                if printhub_db::is_unique_violation(&err) {
                    QueueError::WorkerNameConflict(row.name.clone())
                } else {
                    err.into()
                }
            })?;
        tracing::info!(worker = %row.id, name = %row.name, "worker registered");
        Ok(row)
    }

    /// Ordered job collection for display.
    pub async fn list_jobs(&self) -> Result<Vec<JobRow>, QueueError> {
        let mut conn = self.pool.acquire().await?;
        Ok(queue::list_all(&mut *conn).await?)
    }

    /// Queued jobs only, in queue order.
    pub async fn list_queued(&self) -> Result<Vec<JobRow>, QueueError> {
        let mut conn = self.pool.acquire().await?;
        Ok(queue::list_queued(&mut *conn).await?)
    }

    pub async fn list_workers(&self) -> Result<Vec<WorkerRow>, QueueError> {
        let mut conn = self.pool.acquire().await?;
        Ok(workers::list_all(&mut *conn).await?)
    }

    pub async fn find_job(&self, job_id: Uuid) -> Result<Option<JobRow>, QueueError> {
        let mut conn = self.pool.acquire().await?;
        Ok(queue::find_by_id(&mut *conn, &job_id).await?)
    }

    pub async fn find_worker(&self, worker_id: Uuid) -> Result<Option<WorkerRow>, QueueError> {
        let mut conn = self.pool.acquire().await?;
        Ok(workers::find_by_id(&mut *conn, &worker_id).await?)
    }

    /// Remove every stored artifact no live job references. The live set is
    /// read after the triggering transaction committed, so only files with
    /// no corresponding row can be deleted.
    pub async fn collect_garbage(&self) -> Result<u64, QueueError> {
        let live: HashSet<String> = {
            let mut conn = self.pool.acquire().await?;
            queue::live_codes(&mut *conn).await?.into_iter().collect()
        };
        let removed = self.artifacts.sweep(&live)?;
        if removed > 0 {
            tracing::debug!(removed, "artifact sweep finished");
        }
        Ok(removed)
    }
}
