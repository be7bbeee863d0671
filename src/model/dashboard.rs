//! Aggregates served by `/api/dashboard/*`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentPerformance {
    pub name: String,
    pub super_overall: f64,
}

/// Submission punctuality counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceStats {
    #[serde(default)]
    pub on_time: u32,
    #[serde(default)]
    pub late: u32,
    #[serde(default)]
    pub missed: u32,
}

/// Department names per punctuality bucket, from `/attendance-departments`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttendanceDepartments {
    #[serde(default)]
    pub on_time_departments: Vec<String>,
    #[serde(default)]
    pub late_departments: Vec<String>,
    #[serde(default)]
    pub missed_departments: Vec<String>,
    #[serde(default)]
    pub missed_count: u32,
}

/// Admin stats merged with attendance departments.
///
/// `attendance_departments` is not optional: the combined resource only exists
/// once both endpoints have answered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminDashboardStats {
    pub total_surveys_assigned: u32,
    pub total_surveys_submitted: u32,
    pub surveys_not_submitted: u32,
    #[serde(default)]
    pub department_performance: Vec<DepartmentPerformance>,
    #[serde(default)]
    pub below_80_departments: Vec<String>,
    #[serde(default)]
    pub survey_attendance_stats: Option<AttendanceStats>,
    pub attendance_departments: AttendanceDepartments,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingDepartment {
    pub name: String,
    pub pending_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSurveys {
    #[serde(default)]
    pub total_not_submitted: u32,
    #[serde(default)]
    pub pending_departments: Vec<PendingDepartment>,
}

/// Average rating another department gave the user's department.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentRating {
    pub name: String,
    pub rating: f64,
}
