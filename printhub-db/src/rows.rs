//! Row types and status enums for the `jobs` and `workers` tables.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a print job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queue,
    Printing,
    Completed,
}

impl JobStatus {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Queue => "queue",
            Self::Printing => "printing",
            Self::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "queue" => Some(Self::Queue),
            "printing" => Some(Self::Printing),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// True while the job still pins its artifact file on disk.
    #[inline]
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Queue | Self::Printing)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Availability state of a printer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerStatus {
    Available,
    Printing,
}

impl WorkerStatus {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Printing => "printing",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "available" => Some(Self::Available),
            "printing" => Some(Self::Printing),
            _ => None,
        }
    }
}

impl std::fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the `jobs` table. `queue_position` is meaningful only while
/// `status` is `queue`; dates are RFC 3339 strings.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub upload_id: Uuid,
    pub group_id: Option<Uuid>,
    pub queue_position: Option<i64>,
    pub title: String,
    pub code: String,
    pub color: String,
    pub material: String,
    pub date_posted: String,
    pub date_print_start: Option<String>,
    pub date_print_finish: Option<String>,
    pub qty: i64,
    pub comment: Option<String>,
    pub status: String,
    pub printer_id: Option<Uuid>,
    pub owner_id: Uuid,
}

impl JobRow {
    pub fn status(&self) -> Option<JobStatus> {
        JobStatus::parse(&self.status)
    }

    #[inline]
    pub fn is_queued(&self) -> bool {
        self.status == JobStatus::Queue.as_str()
    }
}

/// One row of the `workers` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WorkerRow {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub material: String,
    pub status: String,
    pub owner_id: Uuid,
}

impl WorkerRow {
    pub fn status(&self) -> Option<WorkerStatus> {
        WorkerStatus::parse(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_status_round_trips_through_strings() {
        for status in [JobStatus::Queue, JobStatus::Printing, JobStatus::Completed] {
            assert_eq!(JobStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(JobStatus::parse("paused"), None);
    }

    #[test]
    fn only_queue_and_printing_pin_artifacts() {
        assert!(JobStatus::Queue.is_live());
        assert!(JobStatus::Printing.is_live());
        assert!(!JobStatus::Completed.is_live());
    }

    #[test]
    fn worker_status_round_trips_through_strings() {
        for status in [WorkerStatus::Available, WorkerStatus::Printing] {
            assert_eq!(WorkerStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(WorkerStatus::parse(""), None);
    }
}
