//! Errors returned by user-triggered actions.

use thiserror::Error;

use crate::framework::FrameworkError;
use crate::http::ApiError;

/// A form field that failed local validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Local, pre-dispatch validation failure. Never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please rate all questions.")]
    UnratedQuestion { question_id: i64 },

    #[error("Please provide remarks for ratings below 3 stars.")]
    MissingRemarks { question_id: i64 },

    #[error("All fields are required to submit your response.")]
    IncompleteResponse,

    #[error("{}", join_messages(.0))]
    Fields(Vec<FieldError>),
}

impl ValidationError {
    /// Title shown alongside the message.
    pub fn title(&self) -> &'static str {
        match self {
            ValidationError::UnratedQuestion { .. } | ValidationError::MissingRemarks { .. } => "Incomplete Survey",
            ValidationError::IncompleteResponse | ValidationError::Fields(_) => "Validation Error",
        }
    }
}

fn join_messages(fields: &[FieldError]) -> String {
    fields.iter().map(|f| f.message).collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Framework(#[from] FrameworkError),

    #[error("Failed to save download: {0}")]
    Download(#[from] std::io::Error),
}

impl ActionError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ActionError::Validation(_))
    }
}
