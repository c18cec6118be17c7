use thiserror::Error;

use crate::features::meeting_requests::models::{LifecycleAction, MeetingStatus};
use crate::shared::templates::TemplateError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Cannot {action} a request that is {status}")]
    InvalidTransition {
        action: LifecycleAction,
        status: MeetingStatus,
    },

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether the caller can recover by correcting its input and retrying.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_message() {
        let err = AppError::InvalidTransition {
            action: LifecycleAction::Reject,
            status: MeetingStatus::Rejected,
        };
        assert_eq!(err.to_string(), "Cannot reject a request that is rejected");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_validation_is_recoverable() {
        let err = AppError::Validation("scheduled_time is required".to_string());
        assert!(err.is_recoverable());
        assert_eq!(
            err.to_string(),
            "Validation error: scheduled_time is required"
        );
    }
}
