use uuid::Uuid;

use super::project::require_project;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::events::TaskEvent;
use crate::models::{CreateTaskInput, Task, TaskFilter, UpdateTaskInput};
use crate::pagination::{Page, Pagination};
use crate::transition;

/// A project's tasks, filtered and paginated, newest first.
pub fn list_tasks(
    db: &Database,
    project_id: Uuid,
    filter: &TaskFilter,
    pagination: Pagination,
) -> Result<Page<Task>> {
    require_project(db, project_id)?;

    let (items, total) = db.find_tasks(project_id, filter, pagination)?;
    Ok(Page {
        items,
        total,
        pagination,
    })
}

pub fn create_task(db: &Database, project_id: Uuid, input: CreateTaskInput) -> Result<Task> {
    require_project(db, project_id)?;

    let task = db.create_task(project_id, input.validate()?)?;
    tracing::debug!(task_id = %task.id, project_id = %project_id, "Created task");
    Ok(task)
}

/// Change a task's status and/or priority.
///
/// The whole patch is checked (enum values, then the status guard) before
/// the single write, so either every requested change lands or none does.
/// Title and description are never touched.
pub fn update_task(db: &Database, id: Uuid, input: UpdateTaskInput) -> Result<Task> {
    let current = require_task(db, id)?;
    let patch = input.validate()?;

    if let Some(next) = patch.status {
        if !transition::can_transition(current.status, next) {
            tracing::warn!(
                task_id = %id,
                from = current.status.as_str(),
                to = next.as_str(),
                "Rejected status transition"
            );
            return Err(Error::InvalidTransition {
                from: current.status,
                to: next,
            });
        }
    }

    // Deleted between the read and the write
    if !db.update_task(id, patch)? {
        return Err(Error::TaskNotFound);
    }

    let updated = Task {
        status: patch.status.unwrap_or(current.status),
        priority: patch.priority.unwrap_or(current.priority),
        ..current.clone()
    };

    for event in TaskEvent::for_update(&current, &updated) {
        event.emit();
    }

    Ok(updated)
}

pub fn delete_task(db: &Database, id: Uuid) -> Result<()> {
    if db.delete_task(id)? {
        tracing::debug!(task_id = %id, "Deleted task");
        Ok(())
    } else {
        Err(Error::TaskNotFound)
    }
}

pub fn require_task(db: &Database, id: Uuid) -> Result<Task> {
    db.get_task(id)?.ok_or(Error::TaskNotFound)
}
