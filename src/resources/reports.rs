//! Admin survey reports.
//!
//! The report list is parameterised by a [`ReportFilter`]. Changing the filter
//! issues a new fetch; a response for an earlier filter that arrives late
//! belongs to an older generation and is discarded by the actor.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::framework::{FrameworkError, RemoteResource, ResourceActor, ResourceHandle};
use crate::http::{ApiClient, ApiError, ApiRequest};
use crate::model::SurveyReportRow;
use crate::views::DepartmentFilter;

use super::spawnable;

pub const ADMIN_REPORTS_PATH: &str = "/api/admin/reports";

const REPORTS_FAILURE: &str = "Failed to load reports";

/// Query of the reports table. Unset departments and an empty period match
/// everything.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportFilter {
    pub from_dept: DepartmentFilter,
    pub to_dept: DepartmentFilter,
    pub time_period: String,
}

impl ReportFilter {
    pub fn new(from_dept: impl Into<DepartmentFilter>, to_dept: impl Into<DepartmentFilter>, time_period: &str) -> Self {
        Self { from_dept: from_dept.into(), to_dept: to_dept.into(), time_period: time_period.to_owned() }
    }

    /// The `GET` this filter maps to. The backend reads an empty department
    /// as "any".
    pub fn request(&self) -> ApiRequest {
        ApiRequest::get(ADMIN_REPORTS_PATH)
            .with_query("fromDept", department_param(&self.from_dept))
            .with_query("toDept", department_param(&self.to_dept))
            .with_query("timePeriod", self.time_period.as_str())
    }
}

fn department_param(filter: &DepartmentFilter) -> &str {
    match filter {
        DepartmentFilter::All => "",
        DepartmentFilter::Named(name) => name,
    }
}

/// Report rows for the filter current at fetch time.
pub struct SurveyReports {
    filter: watch::Receiver<ReportFilter>,
}

#[async_trait]
impl RemoteResource for SurveyReports {
    type Value = Vec<SurveyReportRow>;
    type Patch = ();
    type Context = ApiClient;

    fn name(&self) -> &str {
        "survey-reports"
    }

    async fn fetch(&self, ctx: &ApiClient) -> Result<Vec<SurveyReportRow>, ApiError> {
        let request = self.filter.borrow().request();
        debug!(query = ?request.query, "Fetching survey reports");
        ctx.send_json(request).await
    }

    fn describe_error(&self, _error: &ApiError) -> String {
        REPORTS_FAILURE.to_owned()
    }
}

/// Changes the filter of a running [`SurveyReports`] resource.
#[derive(Clone)]
pub struct ReportSelector {
    filter: Arc<watch::Sender<ReportFilter>>,
    reports: ResourceHandle<SurveyReports>,
}

impl ReportSelector {
    pub fn current(&self) -> ReportFilter {
        self.filter.borrow().clone()
    }

    /// Stores `filter` and refetches, returning the new fetch's generation.
    ///
    /// Before the resource's trigger is satisfied the filter is kept for the
    /// first fetch and `NotReady` is returned.
    pub async fn apply(&self, filter: ReportFilter) -> Result<u64, FrameworkError> {
        info!(?filter, "Report filter changed");
        self.filter.send_replace(filter);
        self.reports.refresh().await
    }
}

/// Creates the reports actor, its handle and the selector driving its filter.
pub fn new(initial: ReportFilter) -> (ResourceActor<SurveyReports>, ResourceHandle<SurveyReports>, ReportSelector) {
    let (sender, receiver) = watch::channel(initial);
    let (actor, handle) = spawnable(SurveyReports { filter: receiver });
    let selector = ReportSelector { filter: Arc::new(sender), reports: handle.clone() };
    (actor, handle, selector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockTransport;
    use crate::framework::{FetchState, FetchTrigger};
    use crate::http::SessionGuard;
    use serde_json::json;
    use std::time::Duration;

    fn row(id: i64, from: &str, to: &str) -> serde_json::Value {
        json!({"id": id, "from_department": from, "to_department": to, "date": "2025-09-01", "remark": ""})
    }

    #[test]
    fn all_departments_map_to_empty_params() {
        let request = ReportFilter::new("All", "IT", "2025-2026 1st Survey").request();
        assert_eq!(request.path, ADMIN_REPORTS_PATH);
        assert_eq!(
            request.query,
            vec![
                ("fromDept".to_string(), String::new()),
                ("toDept".to_string(), "IT".to_string()),
                ("timePeriod".to_string(), "2025-2026 1st Survey".to_string()),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn response_for_previous_filter_is_discarded() {
        let mock = Arc::new(MockTransport::new());
        let unfiltered = mock.expect_get(ADMIN_REPORTS_PATH).deferred();
        mock.expect_get(ADMIN_REPORTS_PATH).return_json(json!([row(2, "HR", "IT")]));

        let (actor, reports, selector) = new(ReportFilter::default());
        tokio::spawn(actor.run(mock.client(SessionGuard::new()), FetchTrigger::always()));
        mock.wait_for_requests(1).await;

        let generation = selector.apply(ReportFilter::new("HR", "All", "")).await.unwrap();
        let filtered = reports.wait_for_generation(generation).await.unwrap();
        assert_eq!(filtered.value.as_ref().unwrap()[0].from_department, "HR");

        unfiltered.respond_json(json!([row(1, "IT", "HR"), row(2, "HR", "IT")]));
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(reports.snapshot(), filtered);
        assert_eq!(mock.requests()[1].query[0], ("fromDept".to_string(), "HR".to_string()));
        assert_eq!(selector.current().from_dept, DepartmentFilter::Named("HR".into()));
        mock.verify();
    }

    #[tokio::test]
    async fn failure_has_fixed_message() {
        let mock = Arc::new(MockTransport::new());
        mock.expect_get(ADMIN_REPORTS_PATH).return_status(500, json!({"detail": "boom"}));

        let (actor, reports, _selector) = new(ReportFilter::default());
        tokio::spawn(actor.run(mock.client(SessionGuard::new()), FetchTrigger::always()));

        let snapshot = reports.settled().await.unwrap();
        assert_eq!(snapshot.state, FetchState::Error);
        assert_eq!(snapshot.error.as_deref(), Some("Failed to load reports"));
    }

    #[tokio::test]
    async fn filter_set_before_sign_in_is_used_for_first_fetch() {
        let mock = Arc::new(MockTransport::new());
        mock.expect_get(ADMIN_REPORTS_PATH).return_json(json!([]));
        let session = SessionGuard::new();

        let (actor, reports, selector) = new(ReportFilter::default());
        tokio::spawn(actor.run(mock.client(session.clone()), FetchTrigger::authenticated(&session)));

        let early = selector.apply(ReportFilter::new("All", "QA", "")).await;
        assert!(matches!(early, Err(FrameworkError::NotReady(_))));
        assert_eq!(mock.request_count(), 0);

        session.sign_in(crate::model::SessionUser {
            id: 1,
            username: "admin".into(),
            name: String::new(),
            email: None,
            department: None,
            role: "admin".into(),
            is_active: true,
        });
        assert_eq!(reports.settled().await.unwrap().value, Some(vec![]));
        assert_eq!(mock.requests()[0].query[1], ("toDept".to_string(), "QA".to_string()));
    }
}
