//! Query primitives for the `workers` table.

use sqlx::Executor;
use uuid::Uuid;

use crate::rows::{WorkerRow, WorkerStatus};
use crate::DbBackend;

const WORKER_COLUMNS: &str = "id, name, color, material, status, owner_id";

pub async fn insert_worker<'e, E>(executor: E, row: &WorkerRow) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    sqlx::query(
        "INSERT INTO workers (id, name, color, material, status, owner_id) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(row.id)
    .bind(&row.name)
    .bind(&row.color)
    .bind(&row.material)
    .bind(&row.status)
    .bind(row.owner_id)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn find_by_id<'e, E>(executor: E, id: &Uuid) -> Result<Option<WorkerRow>, sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    sqlx::query_as::<_, WorkerRow>(&format!("SELECT {WORKER_COLUMNS} FROM workers WHERE id = ?"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn list_all<'e, E>(executor: E) -> Result<Vec<WorkerRow>, sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    sqlx::query_as::<_, WorkerRow>(&format!(
        "SELECT {WORKER_COLUMNS} FROM workers ORDER BY name"
    ))
    .fetch_all(executor)
    .await
}

pub async fn set_status<'e, E>(
    executor: E,
    id: &Uuid,
    status: WorkerStatus,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    sqlx::query("UPDATE workers SET status = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}
