#![allow(clippy::all)]

//! Storage layer for the print-job queue.
//!
//! The queue and worker tables live in SQLite; every query primitive in
//! [`queue`] and [`workers`] is generic over [`sqlx::Executor`] so that the
//! service layer can compose several primitives inside one transaction.

pub type DbBackend = sqlx::Sqlite;

mod config;
mod error;
mod pool;

pub mod queue;
pub mod rows;
pub mod workers;

pub use config::DbConnectionConfig;
pub use error::DbConnectionError;
pub use pool::{create_pool, DbPool};

/// True when the error is a SQLite UNIQUE constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => {
            // 2067 = SQLITE_CONSTRAINT_UNIQUE, 1555 = SQLITE_CONSTRAINT_PRIMARYKEY
            matches!(db.code().as_deref(), Some("2067") | Some("1555"))
                || db.message().contains("UNIQUE constraint failed")
        }
        _ => false,
    }
}

/// True when the error is a transient SQLite write conflict worth retrying.
pub fn is_busy_conflict(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => {
            // 5 = SQLITE_BUSY, 6 = SQLITE_LOCKED, 517 = SQLITE_BUSY_SNAPSHOT
            matches!(db.code().as_deref(), Some("5") | Some("6") | Some("517"))
                || db.message().contains("database is locked")
        }
        _ => false,
    }
}
