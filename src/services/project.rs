use uuid::Uuid;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{CreateProjectInput, Project};
use crate::pagination::{Page, Pagination};

pub fn list_projects(db: &Database, pagination: Pagination) -> Result<Page<Project>> {
    let (items, total) = db.list_projects(pagination)?;
    Ok(Page {
        items,
        total,
        pagination,
    })
}

pub fn create_project(db: &Database, input: CreateProjectInput) -> Result<Project> {
    let project = db.create_project(input.validate()?)?;
    tracing::debug!(project_id = %project.id, "Created project");
    Ok(project)
}

/// Look up a project, treating absence as [`Error::ProjectNotFound`].
pub fn require_project(db: &Database, id: Uuid) -> Result<Project> {
    db.get_project(id)?.ok_or(Error::ProjectNotFound)
}
