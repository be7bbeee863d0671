//! Dashboard aggregates.

use serde_json::{json, Value};

use crate::framework::{ResourceActor, ResourceHandle};
use crate::http::ApiError;
use crate::lifecycle::orchestrator::{merge_objects, MergePrecedence, SequentialMerge};
use crate::model::{AdminDashboardStats, DepartmentRating, PendingSurveys};

use super::{spawnable, FailureMessage, JsonEndpoint};

pub const ADMIN_STATS_PATH: &str = "/api/dashboard/admin-stats";
pub const ATTENDANCE_DEPARTMENTS_PATH: &str = "/api/dashboard/attendance-departments";
pub const PENDING_SURVEYS_PATH: &str = "/api/dashboard/pending-surveys";
pub const DEPARTMENT_RATINGS_PATH: &str = "/api/dashboard/department-ratings";

/// Admin stats with the attendance-by-department breakdown folded in.
pub type AdminDashboard = SequentialMerge<JsonEndpoint<Value>, JsonEndpoint<Value>, AdminDashboardStats>;
pub type PendingSurveyList = JsonEndpoint<PendingSurveys>;
pub type DepartmentRatings = JsonEndpoint<Vec<DepartmentRating>>;

/// The attendance payload lands under `attendance_departments`, replacing
/// whatever the stats endpoint put there.
pub fn merge_attendance(stats: Value, attendance: Value) -> Result<AdminDashboardStats, ApiError> {
    let overlay = json!({ "attendance_departments": attendance });
    let merged = merge_objects(stats, overlay, MergePrecedence::RightWins)?;
    Ok(serde_json::from_value(merged)?)
}

pub fn admin_dashboard() -> AdminDashboard {
    SequentialMerge::new(
        "admin-dashboard",
        JsonEndpoint::new("admin-stats", ADMIN_STATS_PATH),
        JsonEndpoint::new("attendance-departments", ATTENDANCE_DEPARTMENTS_PATH),
        merge_attendance,
    )
    .with_failure_message("Failed to load dashboard stats")
}

pub fn pending_surveys() -> PendingSurveyList {
    JsonEndpoint::new("pending-surveys", PENDING_SURVEYS_PATH)
}

pub fn department_ratings() -> DepartmentRatings {
    JsonEndpoint::new("department-ratings", DEPARTMENT_RATINGS_PATH)
        .with_failure(FailureMessage::Fixed("Failed to load department ratings".into()))
}

pub fn new_admin_dashboard() -> (ResourceActor<AdminDashboard>, ResourceHandle<AdminDashboard>) {
    spawnable(admin_dashboard())
}

pub fn new_pending_surveys() -> (ResourceActor<PendingSurveyList>, ResourceHandle<PendingSurveyList>) {
    spawnable(pending_surveys())
}

pub fn new_department_ratings() -> (ResourceActor<DepartmentRatings>, ResourceHandle<DepartmentRatings>) {
    spawnable(department_ratings())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockTransport;
    use crate::framework::{FetchState, FetchTrigger};
    use crate::http::SessionGuard;
    use std::sync::Arc;

    fn stats() -> Value {
        json!({
            "total_surveys_assigned": 12,
            "total_surveys_submitted": 9,
            "surveys_not_submitted": 3,
            "department_performance": [{"name": "HR", "super_overall": 84.5}],
            "below_80_departments": [],
            "survey_attendance_stats": {"on_time": 7, "late": 2, "missed": 3}
        })
    }

    #[test]
    fn attendance_overrides_stats_field() {
        let mut with_stale = stats();
        with_stale["attendance_departments"] = json!({"missed_count": 99});
        let merged = merge_attendance(with_stale, json!({"missed_departments": ["IT"], "missed_count": 1})).unwrap();
        assert_eq!(merged.attendance_departments.missed_count, 1);
        assert_eq!(merged.attendance_departments.missed_departments, vec!["IT".to_string()]);
        assert_eq!(merged.total_surveys_assigned, 12);
    }

    #[tokio::test]
    async fn admin_dashboard_merges_both_endpoints() {
        let mock = Arc::new(MockTransport::new());
        mock.expect_get(ADMIN_STATS_PATH).return_json(stats());
        mock.expect_get(ATTENDANCE_DEPARTMENTS_PATH).return_json(json!({
            "on_time_departments": ["HR"],
            "late_departments": ["Finance"],
            "missed_departments": ["IT"],
            "missed_count": 1
        }));

        let (actor, handle) = new_admin_dashboard();
        tokio::spawn(actor.run(mock.client(SessionGuard::new()), FetchTrigger::always()));

        let snapshot = handle.settled().await.unwrap();
        let value = snapshot.value.unwrap();
        assert_eq!(value.attendance_departments.late_departments, vec!["Finance".to_string()]);
        assert_eq!(value.survey_attendance_stats.unwrap().missed, 3);
        mock.verify();
    }

    #[tokio::test]
    async fn ratings_failure_has_fixed_message() {
        let mock = Arc::new(MockTransport::new());
        mock.expect_get(DEPARTMENT_RATINGS_PATH).return_status(500, json!({"detail": "boom"}));

        let (actor, handle) = new_department_ratings();
        tokio::spawn(actor.run(mock.client(SessionGuard::new()), FetchTrigger::always()));

        let snapshot = handle.settled().await.unwrap();
        assert_eq!(snapshot.state, FetchState::Error);
        assert_eq!(snapshot.error.as_deref(), Some("Failed to load department ratings"));
    }
}
