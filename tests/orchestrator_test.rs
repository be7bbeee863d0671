use std::sync::Arc;

use serde_json::json;
use survey_resources::framework::mock::MockTransport;
use survey_resources::framework::{FetchState, FetchTrigger};
use reqwest::Method;
use survey_resources::http::SessionGuard;
use survey_resources::resources::dashboard::{self, ADMIN_STATS_PATH, ATTENDANCE_DEPARTMENTS_PATH};
use survey_resources::resources::departments::{self, DEPARTMENTS_PATH, POPULATE_SURVEYS_PATH};

fn admin_stats() -> serde_json::Value {
    json!({
        "total_surveys_assigned": 4,
        "total_surveys_submitted": 1,
        "surveys_not_submitted": 3,
        "department_performance": [{"name": "IT", "super_overall": 62.0}],
        "below_80_departments": ["IT"],
        "survey_attendance_stats": {"on_time": 1, "late": 0, "missed": 3}
    })
}

#[tokio::test]
async fn test_dashboard_fails_as_a_whole_when_attendance_fails() {
    let mock = Arc::new(MockTransport::new());
    mock.expect_get(ADMIN_STATS_PATH).return_json(admin_stats());
    mock.expect_get(ATTENDANCE_DEPARTMENTS_PATH).return_status(500, json!({"detail": "db down"}));

    let (actor, dashboard) = dashboard::new_admin_dashboard();
    tokio::spawn(actor.run(mock.client(SessionGuard::new()), FetchTrigger::always()));

    let snapshot = dashboard.settled().await.unwrap();
    assert_eq!(snapshot.state, FetchState::Error);
    assert_eq!(snapshot.value, None);
    assert_eq!(snapshot.error.as_deref(), Some("Failed to load dashboard stats"));
}

#[tokio::test]
async fn test_dashboard_refresh_refetches_both_parts() {
    let mock = Arc::new(MockTransport::new());
    for missed in [3, 2] {
        mock.expect_get(ADMIN_STATS_PATH).return_json(admin_stats());
        mock.expect_get(ATTENDANCE_DEPARTMENTS_PATH)
            .return_json(json!({"missed_departments": ["IT"], "missed_count": missed}));
    }

    let (actor, dashboard) = dashboard::new_admin_dashboard();
    tokio::spawn(actor.run(mock.client(SessionGuard::new()), FetchTrigger::always()));

    let first = dashboard.settled().await.unwrap().value.unwrap();
    assert_eq!(first.attendance_departments.missed_count, 3);

    let second = dashboard.refresh_and_wait().await.unwrap().value.unwrap();
    assert_eq!(second.attendance_departments.missed_count, 2);
    assert_eq!(second.below_80_departments, vec!["IT".to_string()]);
    mock.verify();
}

#[tokio::test]
async fn test_gate_runs_before_every_department_fetch() {
    let mock = Arc::new(MockTransport::new());
    mock.expect_post(POPULATE_SURVEYS_PATH).return_status(500, json!({"detail": "nope"}));
    mock.expect_get(DEPARTMENTS_PATH).return_json(json!([{"id": 1, "name": "HR"}]));
    mock.expect_post(POPULATE_SURVEYS_PATH).return_json(json!({"message": "ok"}));
    mock.expect_get(DEPARTMENTS_PATH).return_json(json!([{"id": 1, "name": "HR"}, {"id": 2, "name": "IT"}]));

    let (actor, handle, gate_failures) = departments::new_populated();
    tokio::spawn(actor.run(mock.client(SessionGuard::new()), FetchTrigger::always()));

    let first = handle.settled().await.unwrap();
    assert_eq!(first.state, FetchState::Ready);
    assert_eq!(first.value.unwrap().len(), 1);
    assert_eq!(gate_failures.count(), 1);

    let second = handle.refresh_and_wait().await.unwrap();
    assert_eq!(second.value.unwrap().len(), 2);
    assert_eq!(gate_failures.count(), 1);

    let methods: Vec<Method> = mock.requests().into_iter().map(|r| r.method).collect();
    assert_eq!(methods, vec![Method::POST, Method::GET, Method::POST, Method::GET]);
    mock.verify();
}
