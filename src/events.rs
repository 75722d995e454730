//! Audit events raised by task operations.
//!
//! Events are emitted after the change they describe has been committed and
//! are recorded on the `audit` tracing target.

use uuid::Uuid;

use crate::models::Task;
use crate::transition;

/// Something worth recording about a task change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskEvent {
    /// The task skipped `in_progress` and went straight from `todo` to `done`.
    FastTracked { task_id: Uuid, project_id: Uuid },
}

impl TaskEvent {
    /// Events produced by a committed update from `before` to `after`.
    pub fn for_update(before: &Task, after: &Task) -> Vec<TaskEvent> {
        let mut events = Vec::new();
        if transition::is_fast_tracked(before.status, after.status) {
            events.push(TaskEvent::FastTracked {
                task_id: after.id,
                project_id: after.project_id,
            });
        }
        events
    }

    pub fn emit(&self) {
        match self {
            TaskEvent::FastTracked {
                task_id,
                project_id,
            } => {
                tracing::info!(
                    target: "audit",
                    task_id = %task_id,
                    project_id = %project_id,
                    "Task was fast-tracked from todo to done"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TaskPriority, TaskStatus};
    use chrono::Utc;

    fn task(status: TaskStatus) -> Task {
        Task {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            title: "T".to_string(),
            description: None,
            status,
            priority: TaskPriority::Low,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn todo_to_done_raises_fast_tracked() {
        let before = task(TaskStatus::Todo);
        let after = Task {
            status: TaskStatus::Done,
            ..before.clone()
        };

        assert_eq!(
            TaskEvent::for_update(&before, &after),
            vec![TaskEvent::FastTracked {
                task_id: before.id,
                project_id: before.project_id,
            }]
        );
    }

    #[test]
    fn other_updates_raise_nothing() {
        let before = task(TaskStatus::InProgress);
        let after = Task {
            status: TaskStatus::Done,
            ..before.clone()
        };
        assert!(TaskEvent::for_update(&before, &after).is_empty());

        let before = task(TaskStatus::Todo);
        let after = Task {
            priority: TaskPriority::High,
            ..before.clone()
        };
        assert!(TaskEvent::for_update(&before, &after).is_empty());
    }
}
