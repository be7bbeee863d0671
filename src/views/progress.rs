//! Survey completion for the user dashboard.

use std::collections::HashSet;

use crate::model::{PendingSurveys, SurveyData, UserSubmission};

use super::scoring::rounded_percentage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurveyProgress {
    pub completed: u32,
    pub total: u32,
    pub percentage: u32,
}

impl SurveyProgress {
    pub fn new(completed: u32, total: u32) -> Self {
        Self { completed, total, percentage: rounded_percentage(completed, total) }
    }

    /// Completed submissions against assigned surveys.
    pub fn from_lists(assigned: &[SurveyData], submissions: &[UserSubmission]) -> Self {
        Self::new(count(submissions.len()), count(assigned.len()))
    }

    pub fn remaining(&self) -> u32 {
        self.total.saturating_sub(self.completed)
    }
}

fn count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

/// Assigned surveys the user has not submitted yet.
pub fn pending_surveys<'a>(assigned: &'a [SurveyData], submissions: &[UserSubmission]) -> Vec<&'a SurveyData> {
    let submitted: HashSet<i64> = submissions.iter().map(|s| s.survey_id).collect();
    assigned.iter().filter(|survey| !submitted.contains(&survey.id)).collect()
}

/// A row of the admin "yet to complete" list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRow {
    pub department: String,
    pub pending: u32,
    pub label: String,
}

/// Departments with outstanding surveys, labelled "{n} Pending".
pub fn pending_department_rows(pending: &PendingSurveys) -> Vec<PendingRow> {
    pending
        .pending_departments
        .iter()
        .filter(|d| d.pending_count > 0)
        .map(|d| PendingRow {
            department: d.name.clone(),
            pending: d.pending_count,
            label: format!("{} Pending", d.pending_count),
        })
        .collect()
}
