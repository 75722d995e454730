use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::project::non_blank;
use crate::error::Error;
use crate::pagination::Pagination;

const INVALID_ENUM_VALUE: &str = "Invalid status or priority value.";

/// A unit of work under a project.
///
/// `project_id` and `created_at` never change after creation. Only `status`
/// and `priority` are mutable, and `status` only moves forward (see
/// [`crate::transition`]).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub created_at: DateTime<Utc>,
}

/// The lifecycle status of a task.
///
/// - `Todo`: Not yet started
/// - `InProgress`: Being worked on
/// - `Done`: Finished, terminal
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [Self::Todo, Self::InProgress, Self::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "todo" => Some(Self::Todo),
            "in_progress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

/// How urgent a task is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Input for creating a task within a project, as sent by the client.
///
/// Fields stay raw strings so that unknown enum values surface as validation
/// errors with our own messages instead of deserialization failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTaskInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
}

/// A task that passed validation and is ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
}

impl CreateTaskInput {
    pub fn new(title: impl Into<String>, priority: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            priority: Some(priority.into()),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Validate in two phases: required fields first, then enum membership.
    ///
    /// All shape violations are reported together (title before priority);
    /// enum values are only looked at once the shape is sound.
    pub fn validate(self) -> Result<NewTask, Error> {
        let title = non_blank(self.title);
        let priority = non_blank(self.priority);

        let mut violations = Vec::new();
        if title.is_none() {
            violations.push("Title is required.");
        }
        if priority.is_none() {
            violations.push("Priority is required.");
        }
        let (Some(title), Some(priority)) = (title, priority) else {
            return Err(Error::validation(violations.join("\n")));
        };

        let status = match self.status.as_deref() {
            None | Some("") => TaskStatus::default(),
            Some(s) => TaskStatus::from_str(s).ok_or_else(|| Error::validation(INVALID_ENUM_VALUE))?,
        };
        let priority = TaskPriority::from_str(&priority)
            .ok_or_else(|| Error::validation(INVALID_ENUM_VALUE))?;

        Ok(NewTask {
            title,
            description: non_blank(self.description),
            status,
            priority,
        })
    }
}

/// Input for updating a task. Only status and priority can change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTaskInput {
    pub status: Option<String>,
    pub priority: Option<String>,
}

/// Validated changes to apply to a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

impl UpdateTaskInput {
    pub fn status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            priority: None,
        }
    }

    pub fn priority(priority: impl Into<String>) -> Self {
        Self {
            status: None,
            priority: Some(priority.into()),
        }
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn validate(self) -> Result<TaskPatch, Error> {
        if self.status.is_none() && self.priority.is_none() {
            return Err(Error::validation(
                "At least one of status or priority must be provided.",
            ));
        }

        let status = self
            .status
            .map(|s| TaskStatus::from_str(&s).ok_or_else(|| Error::validation(INVALID_ENUM_VALUE)))
            .transpose()?;
        let priority = self
            .priority
            .map(|p| TaskPriority::from_str(&p).ok_or_else(|| Error::validation(INVALID_ENUM_VALUE)))
            .transpose()?;

        Ok(TaskPatch { status, priority })
    }
}

/// Query parameters for listing a project's tasks.
///
/// Everything arrives as a raw string; see [`ListTasksQuery::filter`] and
/// [`Pagination::normalize`] for how each value is interpreted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListTasksQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub status: Option<String>,
    pub title: Option<String>,
}

impl ListTasksQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::normalize(self.page.as_deref(), self.limit.as_deref())
    }

    pub fn filter(&self) -> Result<TaskFilter, Error> {
        let status = match self.status.as_deref() {
            None | Some("") => None,
            Some(s) => Some(TaskStatus::from_str(s).ok_or_else(|| {
                Error::validation("Invalid status value. Allowed: todo, in_progress, done.")
            })?),
        };

        Ok(TaskFilter {
            status,
            title: non_blank(self.title.clone()),
        })
    }
}

/// Restrictions applied when listing a project's tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Exact status match.
    pub status: Option<TaskStatus>,
    /// Case-insensitive substring of the title, already trimmed.
    pub title: Option<String>,
}

impl TaskFilter {
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = non_blank(Some(title.into()));
        self
    }
}
