//! Form checks performed before any request is sent.

use crate::config::{LOW_RATING_MAX, MIN_PASSWORD_LEN};
use crate::model::{RemarkResponse, SubmittedAnswer, SurveyAnswer};

use super::error::{FieldError, ValidationError};

/// Every question rated; every low rating explained.
pub fn validate_survey(answers: &[SurveyAnswer]) -> Result<(), ValidationError> {
    if let Some(unrated) = answers.iter().find(|a| a.rating == 0) {
        return Err(ValidationError::UnratedQuestion { question_id: unrated.id });
    }
    if let Some(low) = answers
        .iter()
        .find(|a| a.rating <= LOW_RATING_MAX && a.remarks.trim().is_empty())
    {
        return Err(ValidationError::MissingRemarks { question_id: low.id });
    }
    Ok(())
}

/// Answers as sent to the backend: blank remarks are omitted.
pub fn submitted_answers(answers: &[SurveyAnswer]) -> Vec<SubmittedAnswer> {
    answers
        .iter()
        .map(|a| SubmittedAnswer {
            id: a.id,
            rating: a.rating,
            remarks: non_blank(&a.remarks),
        })
        .collect()
}

pub fn non_blank(text: &str) -> Option<String> {
    (!text.trim().is_empty()).then(|| text.to_owned())
}

/// Response to an incoming remark.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemarkResponseForm {
    pub explanation: String,
    pub action_plan: String,
    pub responsible_person: String,
}

impl RemarkResponseForm {
    /// All three fields must be non-blank.
    pub fn validate(&self, feedback_id: i64) -> Result<RemarkResponse, ValidationError> {
        let fields = [&self.explanation, &self.action_plan, &self.responsible_person];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(ValidationError::IncompleteResponse);
        }
        Ok(RemarkResponse {
            id: feedback_id,
            explanation: self.explanation.clone(),
            action_plan: self.action_plan.clone(),
            responsible_person: self.responsible_person.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl PasswordForm {
    /// Collects every failing field rather than stopping at the first.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        if self.current_password.is_empty() {
            errors.push(FieldError { field: "currentPassword", message: "Current password is required" });
        }
        if self.new_password.is_empty() {
            errors.push(FieldError { field: "newPassword", message: "New password is required" });
        } else if self.new_password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(FieldError { field: "newPassword", message: "Password must be at least 6 characters" });
        }
        if self.confirm_password.is_empty() {
            errors.push(FieldError { field: "confirmPassword", message: "Please confirm your password" });
        } else if self.new_password != self.confirm_password {
            errors.push(FieldError { field: "confirmPassword", message: "Passwords do not match" });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::Fields(errors))
        }
    }
}
