use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// A project containing tasks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new project, as sent by the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateProjectInput {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// A project that passed validation and is ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
}

impl CreateProjectInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Trim the fields and check the name is present.
    pub fn validate(self) -> Result<NewProject, Error> {
        let name = non_blank(self.name)
            .ok_or_else(|| Error::Validation("Project name is required.".to_string()))?;

        Ok(NewProject {
            name,
            description: non_blank(self.description),
        })
    }
}

/// Trimmed value, or `None` when absent or blank.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
