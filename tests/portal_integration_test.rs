use std::sync::Arc;

use serde_json::json;
use survey_resources::framework::mock::MockTransport;
use survey_resources::framework::FetchState;
use survey_resources::http::{DirectorySink, SessionGuard};
use survey_resources::lifecycle::{AdminConsole, UserPortal};
use survey_resources::resources::dashboard::{
    ADMIN_STATS_PATH, ATTENDANCE_DEPARTMENTS_PATH, DEPARTMENT_RATINGS_PATH, PENDING_SURVEYS_PATH,
};
use survey_resources::resources::departments::{DEPARTMENTS_PATH, POPULATE_SURVEYS_PATH};
use survey_resources::resources::remarks::{CUSTOMER_FOCUS_PATH, INCOMING_PATH, OUTGOING_PATH};
use survey_resources::resources::reports::{ReportFilter, ADMIN_REPORTS_PATH};
use survey_resources::resources::surveys::{survey_path, ASSIGNED_SURVEYS_PATH, USER_SUBMISSIONS_PATH};
use survey_resources::views::{needs_attention, rating_bars, SurveyProgress};

fn verify_body() -> serde_json::Value {
    json!({
        "isAuthenticated": true,
        "user": {"id": 8, "username": "jdoe", "name": "J. Doe", "department": "Finance", "role": "user"}
    })
}

fn expect_portal_load(mock: &MockTransport) {
    mock.expect_post(POPULATE_SURVEYS_PATH).return_json(json!({"message": "populated"}));
    mock.expect_get(DEPARTMENTS_PATH).return_json(json!([{"id": 1, "name": "Finance"}, {"id": 2, "name": "IT"}]));
    mock.expect_get(DEPARTMENT_RATINGS_PATH)
        .return_json(json!([{"name": "IT", "rating": 72.5}, {"name": "HR", "rating": 91.0}]));
    mock.expect_get(ASSIGNED_SURVEYS_PATH).return_json(json!([
        {"id": 10, "title": "IT support", "rated_department_id": 2},
        {"id": 11, "title": "HR onboarding", "rated_department_id": 3}
    ]));
    mock.expect_get(USER_SUBMISSIONS_PATH).return_json(json!([
        {"id": 99, "survey_id": 10, "submitter_user_id": 8, "rated_department_id": 2}
    ]));
    mock.expect_get(INCOMING_PATH).return_json(json!([]));
    mock.expect_get(OUTGOING_PATH).return_json(json!([]));
}

/// Full end-to-end test of the user portal against a scripted backend.
#[tokio::test]
async fn test_user_portal_signs_in_loads_and_signs_out() {
    let downloads = tempfile::tempdir().expect("Failed to create temp dir");
    let mock = Arc::new(MockTransport::new());
    let portal = UserPortal::new(
        mock.client(SessionGuard::new()),
        Arc::new(DirectorySink::new(downloads.path())),
    );

    // Nothing is fetched before the auth check resolves.
    assert_eq!(portal.ratings.snapshot().state, FetchState::Idle);
    assert_eq!(mock.request_count(), 0);

    mock.expect_get("/verify_auth").return_json(verify_body());
    expect_portal_load(&mock);
    let user = portal.auth.verify().await.expect("Verification failed").expect("No user");
    assert_eq!(user.id, 8);

    let (departments, ratings, assigned, submissions) = tokio::try_join!(
        portal.departments.settled(),
        portal.ratings.settled(),
        portal.assigned.settled(),
        portal.submissions.settled(),
    )
    .expect("Resources failed to settle");
    portal.incoming.settled().await.expect("Incoming failed to settle");
    portal.outgoing.settled().await.expect("Outgoing failed to settle");

    assert_eq!(departments.value.expect("No departments").len(), 2);
    assert_eq!(portal.gate_failures.count(), 0);

    let bars = rating_bars(&ratings.value.expect("No ratings"));
    assert_eq!(needs_attention(&bars), vec!["IT"]);

    let progress = SurveyProgress::from_lists(
        &assigned.value.expect("No assigned surveys"),
        &submissions.value.expect("No submissions"),
    );
    assert_eq!(progress.completed, 1);
    assert_eq!(progress.total, 2);
    assert_eq!(progress.remaining(), 1);

    // Logging out resets every gated resource.
    mock.expect_post("/logout").return_json(json!({"message": "bye"}));
    portal.auth.logout().await.expect("Logout failed");
    let mut outgoing = portal.outgoing.subscribe();
    outgoing.wait_for(|s| s.state == FetchState::Idle).await.expect("Actor closed");
    let mut ratings = portal.ratings.subscribe();
    let reset = ratings.wait_for(|s| s.state == FetchState::Idle).await.expect("Actor closed").clone();
    assert_eq!(reset.value, None);

    mock.verify();
    portal.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_opened_survey_loads_after_sign_in() {
    let downloads = tempfile::tempdir().expect("Failed to create temp dir");
    let mock = Arc::new(MockTransport::new());
    let session = SessionGuard::new();
    let mut portal = UserPortal::new(mock.client(session.clone()), Arc::new(DirectorySink::new(downloads.path())));

    mock.expect_get(&survey_path(10)).return_status(404, json!({"detail": "Survey not found"}));
    let survey = portal.open_survey(10);

    expect_portal_load(&mock);
    mock.expect_get("/verify_auth").return_json(verify_body());
    portal.auth.verify().await.expect("Verification failed");

    let snapshot = survey.settled().await.expect("Survey actor closed");
    assert_eq!(snapshot.state, FetchState::Error);
    assert_eq!(snapshot.error.as_deref(), Some("Survey not found"));

    drop(survey);
    portal.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_admin_console_customer_focus_needs_no_session() {
    let downloads = tempfile::tempdir().expect("Failed to create temp dir");
    let mock = Arc::new(MockTransport::new());
    mock.expect_get(CUSTOMER_FOCUS_PATH).return_json(json!([
        {"id": "cf-1", "department": "IT", "toDepartment": "IT", "remark": "late tickets"}
    ]));
    mock.expect_get(ADMIN_REPORTS_PATH).return_json(json!([
        {"id": 3, "from_department": "HR", "to_department": "IT", "date": "2025-09-02", "remark": "slow"}
    ]));

    let console = AdminConsole::new(mock.client(SessionGuard::new()), Arc::new(DirectorySink::new(downloads.path())));
    let focus = console.customer_focus.settled().await.expect("Customer focus failed to settle");
    assert_eq!(focus.value.expect("No rows")[0].id, "cf-1");
    assert_eq!(console.dashboard.snapshot().state, FetchState::Idle);
    let reports = console.reports.settled().await.expect("Reports failed to settle");
    assert_eq!(reports.value.expect("No reports")[0].to_department, "IT");

    mock.expect_get(ADMIN_STATS_PATH).return_json(json!({
        "total_surveys_assigned": 2,
        "total_surveys_submitted": 2,
        "surveys_not_submitted": 0
    }));
    mock.expect_get(ATTENDANCE_DEPARTMENTS_PATH).return_json(json!({"on_time_departments": ["IT", "HR"]}));
    mock.expect_get(PENDING_SURVEYS_PATH).return_json(json!({"total_not_submitted": 0, "pending_departments": []}));
    mock.expect_get(DEPARTMENTS_PATH).return_json(json!([]));
    mock.expect_get("/verify_auth").return_json(json!({
        "isAuthenticated": true,
        "user": {"id": 1, "username": "admin", "role": "admin"}
    }));
    console.auth.verify().await.expect("Verification failed");

    let stats = console.dashboard.settled().await.expect("Dashboard failed to settle");
    let stats = stats.value.expect("No stats");
    assert_eq!(stats.attendance_departments.on_time_departments.len(), 2);
    console.pending.settled().await.expect("Pending failed to settle");
    console.departments.settled().await.expect("Departments failed to settle");

    mock.expect_get(ADMIN_REPORTS_PATH).return_json(json!([]));
    let generation = console
        .report_filter
        .apply(ReportFilter::new("All", "Finance", "2025-2026 1st Survey"))
        .await
        .expect("Filter change failed");
    let reports = console.reports.wait_for_generation(generation).await.expect("Reports failed to settle");
    assert_eq!(reports.value, Some(vec![]));

    mock.verify();
    console.shutdown().await.expect("Shutdown failed");
}
