//! Shared per-task status, updated from progress callbacks

use crate::TaskId;
use invoice_merge::{MergePhase, MergeReport, ProgressReport};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Lifecycle of a merge task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Rasterizing,
    Composing,
    Completed,
    Failed,
}

/// Snapshot of one task
#[derive(Debug, Clone, PartialEq)]
pub struct TaskStatus {
    pub state: TaskState,
    /// 0-50 while rasterizing, 50-100 while composing
    pub percent: u8,
    pub processed: usize,
    pub total: usize,
    pub current_file: Option<String>,
    pub message: Option<String>,
}

impl TaskStatus {
    fn pending(total: usize) -> Self {
        Self {
            state: TaskState::Pending,
            percent: 0,
            processed: 0,
            total,
            current_file: None,
            message: None,
        }
    }
}

/// Task status table shared between the worker and front-ends
#[derive(Debug, Clone, Default)]
pub struct StatusStore {
    tasks: Arc<Mutex<HashMap<TaskId, TaskStatus>>>,
}

impl StatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task that has not started yet
    pub fn insert_pending(&self, task_id: TaskId, total: usize) {
        self.lock().insert(task_id, TaskStatus::pending(total));
    }

    pub fn record_progress(&self, task_id: TaskId, report: &ProgressReport) {
        let mut tasks = self.lock();
        let status = tasks
            .entry(task_id)
            .or_insert_with(|| TaskStatus::pending(report.total));

        let (state, base) = match report.phase {
            MergePhase::Rasterizing => (TaskState::Rasterizing, 0),
            MergePhase::Composing => (TaskState::Composing, 50),
        };

        status.state = state;
        status.percent = base + phase_percent(report.processed, report.total);
        status.processed = report.processed;
        status.total = report.total;
        status.current_file = Some(report.label.clone());
    }

    pub fn complete(&self, task_id: TaskId, report: &MergeReport) {
        let mut message = format!(
            "Merged {} files onto {} pages",
            report.placed, report.output_pages
        );
        if !report.skipped.is_empty() {
            message.push_str(&format!(", skipped {}", report.skipped.len()));
        }

        let mut tasks = self.lock();
        let status = tasks
            .entry(task_id)
            .or_insert_with(|| TaskStatus::pending(report.placed));
        status.state = TaskState::Completed;
        status.percent = 100;
        status.current_file = None;
        status.message = Some(message);
    }

    pub fn fail(&self, task_id: TaskId, message: impl Into<String>) {
        let mut tasks = self.lock();
        let status = tasks
            .entry(task_id)
            .or_insert_with(|| TaskStatus::pending(0));
        status.state = TaskState::Failed;
        status.message = Some(message.into());
    }

    pub fn get(&self, task_id: TaskId) -> Option<TaskStatus> {
        self.lock().get(&task_id).cloned()
    }

    pub fn remove(&self, task_id: TaskId) -> Option<TaskStatus> {
        self.lock().remove(&task_id)
    }

    // A panicking callback must not take the table down with it
    fn lock(&self) -> MutexGuard<'_, HashMap<TaskId, TaskStatus>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Share of one phase's 50 points
fn phase_percent(processed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((processed.min(total) * 50) / total) as u8
}
