use chrono::Utc;

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::common::RecordId;
use crate::domain::task::{Task, TaskStatus};
use crate::ledger::Ledger;

/// Operations for maintaining tasks.
pub struct TaskService;

impl TaskService {
    pub fn add(ledger: &mut Ledger, task: Task) -> ServiceResult<RecordId> {
        if task.title.trim().is_empty() {
            return Err(ServiceError::Invalid("task title must not be empty".into()));
        }
        Ok(ledger.add_task(task))
    }

    pub fn update(
        ledger: &mut Ledger,
        id: RecordId,
        mutate: impl FnOnce(&mut Task),
    ) -> ServiceResult<()> {
        let task = ledger
            .task_mut(id)
            .ok_or_else(|| ServiceError::Invalid(format!("task {id} not found")))?;
        mutate(task);
        task.updated_at = Utc::now();
        ledger.touch();
        Ok(())
    }

    pub fn remove(ledger: &mut Ledger, id: RecordId) -> ServiceResult<Task> {
        ledger
            .remove_task(id)
            .ok_or_else(|| ServiceError::Invalid(format!("task {id} not found")))
    }

    pub fn list(ledger: &Ledger) -> &[Task] {
        &ledger.tasks
    }

    /// Completed tasks flip back to pending and drop their completion stamp;
    /// anything else completes now.
    pub fn toggle_status(ledger: &mut Ledger, id: RecordId) -> ServiceResult<TaskStatus> {
        let task = ledger
            .task_mut(id)
            .ok_or_else(|| ServiceError::Invalid(format!("task {id} not found")))?;
        let now = Utc::now();
        match task.status {
            TaskStatus::Completed => {
                task.status = TaskStatus::Pending;
                task.completed_at = None;
            }
            _ => {
                task.status = TaskStatus::Completed;
                task.completed_at = Some(now);
            }
        }
        task.updated_at = now;
        let status = task.status;
        ledger.touch();
        Ok(status)
    }
}
