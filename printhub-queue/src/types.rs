//! Request and result types for the queue service.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A job submission. The artifact bytes are written to the store before the
/// job row commits.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub title: String,
    pub color: String,
    pub material: String,
    pub qty: i64,
    pub comment: Option<String>,
    /// Caller-defined grouping id, propagated to split siblings.
    pub group_id: Option<Uuid>,
    /// Artifact filename; must be unique among live jobs unless `overwrite`.
    pub filename: String,
    pub bytes: Vec<u8>,
    pub overwrite: bool,
}

/// A printer registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWorker {
    pub name: String,
    pub color: String,
    pub material: String,
}

/// What a worker receives from a successful poll: the printing job instance
/// and the artifact it should fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dispatch {
    pub job_id: Uuid,
    pub title: String,
    pub code: String,
}

/// Manual reorder directions over the queued subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Top,
    Bottom,
}

impl Direction {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
