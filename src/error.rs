//! Error types shared by the service layer.

use thiserror::Error;

use crate::models::TaskStatus;

/// Result type alias using Taskdeck's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Failures an operation on projects or tasks can report.
///
/// The display text of every variant except [`Error::Internal`] is safe to
/// show to API clients verbatim.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Project not found.")]
    ProjectNotFound,

    #[error("Task not found.")]
    TaskNotFound,

    /// Missing or blank required field, or a malformed enum value.
    #[error("{0}")]
    Validation(String),

    /// The status guard rejected the requested move.
    #[error("Invalid status transition.")]
    InvalidTransition { from: TaskStatus, to: TaskStatus },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_messages_are_stable() {
        assert_eq!(Error::ProjectNotFound.to_string(), "Project not found.");
        assert_eq!(Error::TaskNotFound.to_string(), "Task not found.");
        assert_eq!(
            Error::InvalidTransition {
                from: TaskStatus::Done,
                to: TaskStatus::Todo,
            }
            .to_string(),
            "Invalid status transition."
        );
        assert_eq!(Error::validation("Title is required.").to_string(), "Title is required.");
    }

    #[test]
    fn internal_wraps_anyhow() {
        let err: Error = anyhow::anyhow!("disk I/O error").into();
        assert!(matches!(err, Error::Internal(_)));
    }
}
