use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use super::error::{masked, parse_id, ApiError};
use crate::db::Database;
use crate::error::Error;
use crate::models::*;
use crate::pagination::{Page, Pagination};
use crate::services;

// ============================================================
// Response bodies
// ============================================================

/// `GET /api/projects` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectList {
    pub data: Vec<Project>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

impl From<Page<Project>> for ProjectList {
    fn from(page: Page<Project>) -> Self {
        Self {
            page: page.pagination.page,
            limit: page.pagination.limit,
            total: page.total,
            data: page.items,
        }
    }
}

/// `GET /api/projects/{projectId}/tasks` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskList {
    pub data: Vec<Task>,
    pub meta: ListMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl From<Page<Task>> for TaskList {
    fn from(page: Page<Task>) -> Self {
        Self {
            meta: ListMeta {
                page: page.pagination.page,
                limit: page.pagination.limit,
                total: page.total,
                total_pages: page.total_pages(),
            },
            data: page.items,
        }
    }
}

/// Query parameters for paginated lists.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Projects
// ============================================================

pub async fn list_projects(
    State(db): State<Database>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<ProjectList>, ApiError> {
    let Query(query) = query?;
    let pagination = Pagination::normalize(query.page.as_deref(), query.limit.as_deref());

    services::list_projects(&db, pagination)
        .map(|page| Json(page.into()))
        .map_err(|e| masked(e, "Failed to fetch projects."))
}

pub async fn create_project(
    State(db): State<Database>,
    payload: Result<Json<CreateProjectInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let Json(input) = payload?;

    services::create_project(&db, input)
        .map(|p| (StatusCode::CREATED, Json(p)))
        .map_err(ApiError::from)
}

// ============================================================
// Tasks
// ============================================================

pub async fn list_tasks(
    State(db): State<Database>,
    Path(project_id): Path<String>,
    query: Result<Query<ListTasksQuery>, QueryRejection>,
) -> Result<Json<TaskList>, ApiError> {
    let project_id = parse_id(&project_id, Error::ProjectNotFound)?;
    let Query(query) = query?;

    let filter = match query.filter() {
        Ok(filter) => filter,
        Err(err) => {
            // Unknown project wins over a bad filter
            services::require_project(&db, project_id)
                .map_err(|e| masked(e, "Failed to fetch tasks."))?;
            return Err(err.into());
        }
    };

    services::list_tasks(&db, project_id, &filter, query.pagination())
        .map(|page| Json(page.into()))
        .map_err(|e| masked(e, "Failed to fetch tasks."))
}

pub async fn create_task(
    State(db): State<Database>,
    Path(project_id): Path<String>,
    payload: Result<Json<CreateTaskInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let project_id = parse_id(&project_id, Error::ProjectNotFound)?;
    let Json(input) = payload.or_else(|rejection| -> Result<_, ApiError> {
        services::require_project(&db, project_id)?;
        Err(ApiError::from(rejection))
    })?;

    services::create_task(&db, project_id, input)
        .map(|t| (StatusCode::CREATED, Json(t)))
        .map_err(ApiError::from)
}

pub async fn update_task(
    State(db): State<Database>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTaskInput>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_id(&id, Error::TaskNotFound)?;
    let Json(input) = payload.or_else(|rejection| -> Result<_, ApiError> {
        services::require_task(&db, id)?;
        Err(ApiError::from(rejection))
    })?;

    services::update_task(&db, id, input)
        .map(Json)
        .map_err(ApiError::from)
}

pub async fn delete_task(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, Error::TaskNotFound)?;

    services::delete_task(&db, id)
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(ApiError::from)
}
