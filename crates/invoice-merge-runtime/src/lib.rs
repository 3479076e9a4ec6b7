//! Front-end plumbing for running merges off the interactive thread
//!
//! Front-ends send `MergeCommand`s to [`worker_task`] and receive
//! `MergeUpdate`s back over tokio channels. Progress of every merge is also
//! mirrored into a shared [`StatusStore`] for polling-style front-ends.

mod logger;
mod status;
mod worker;

use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

pub use logger::{LogEntry, MergeLogger};
pub use status::{StatusStore, TaskState, TaskStatus};
pub use worker::worker_task;

// Re-export types from the library crate
pub use invoice_merge::{MergeOptions, MergeReport, MergeStatistics, ProgressReport};

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

/// Handle to a submitted merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

impl TaskId {
    /// Allocate a process-unique id
    pub fn next() -> Self {
        TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::SeqCst))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Commands sent from a front-end to the worker
#[derive(Debug)]
pub enum MergeCommand {
    Merge {
        task_id: TaskId,
        inputs: Vec<PathBuf>,
        output: PathBuf,
        options: MergeOptions,
    },
    CalculateStats {
        inputs: Vec<PathBuf>,
        options: MergeOptions,
    },
    LoadConfig {
        path: PathBuf,
    },
}

/// Updates sent from the worker to a front-end
#[derive(Debug, Clone)]
pub enum MergeUpdate {
    Progress {
        task_id: TaskId,
        report: ProgressReport,
    },
    Completed {
        task_id: TaskId,
        report: MergeReport,
    },
    StatsCalculated {
        stats: MergeStatistics,
    },
    ConfigLoaded {
        options: MergeOptions,
    },
    /// `task_id` is `None` for commands not tied to a merge
    Error {
        task_id: Option<TaskId>,
        message: String,
    },
}
