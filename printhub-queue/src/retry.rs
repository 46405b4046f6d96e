use std::future::Future;
use std::time::Duration;

use crate::error::QueueError;

pub(crate) const MAX_TX_RETRIES: u32 = 5;
const RETRY_BASE_DELAY: Duration = Duration::from_millis(10);

/// Runs a transactional operation, retrying the whole thing on transient
/// SQLite write conflicts. The operation must be safe to re-run from
/// scratch; partial state never escapes because each attempt is one
/// transaction. Exhausted retries surface as [`QueueError::Conflict`].
pub(crate) async fn with_retry<T, F, Fut>(op_name: &'static str, op: F) -> Result<T, QueueError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, QueueError>>,
{
    let mut attempt = 0u32;
    loop {
        match op().await {
            Err(QueueError::Db(err)) if printhub_db::is_busy_conflict(&err) => {
                attempt += 1;
                if attempt > MAX_TX_RETRIES {
                    tracing::warn!(op = op_name, attempts = attempt, "transaction retries exhausted");
                    return Err(QueueError::Conflict);
                }
                tracing::debug!(op = op_name, attempt, "retrying after write conflict");
                tokio::time::sleep(RETRY_BASE_DELAY * attempt).await;
            }
            other => return other,
        }
    }
}
