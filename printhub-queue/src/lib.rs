//! Queue scheduling core for the PrintHub printer fleet.
//!
//! Owners submit jobs that require a specific filament color and material;
//! printers poll for work and announce a fixed capability. This crate keeps
//! the pending queue strictly ordered (queued positions are always a dense
//! 1..N permutation), dispatches the best eligible job to a polling worker
//! (splitting multi-quantity jobs into single-unit printing instances),
//! applies manual reordering, drains completed work, and garbage-collects
//! artifact files no longer referenced by any live job.
//!
//! All read-then-write sequences over positions and quantities run inside a
//! single SQLite transaction; write conflicts between concurrent callers are
//! retried as whole operations a bounded number of times.
//!
//! # Architecture
//!
//! - [`QueueService`] - facade over the store and the artifact directory
//! - [`Dispatch`] - what a worker receives from a successful poll
//! - [`ArtifactStore`] - filesystem store with a liveness-driven sweep

mod assign;
mod complete;
mod error;
mod gc;
mod reorder;
mod retry;
mod service;
mod types;

pub use error::QueueError;
pub use gc::ArtifactStore;
pub use service::QueueService;
pub use types::{Direction, Dispatch, NewJob, NewWorker};

pub use printhub_db::rows::{JobRow, JobStatus, WorkerRow, WorkerStatus};
