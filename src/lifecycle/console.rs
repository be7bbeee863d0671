use std::sync::Arc;

use tracing::info;

use crate::actions::{ActionDispatcher, ActionTargets, Notifier, ReportExporter};
use crate::config::PortalConfig;
use crate::framework::{FetchTrigger, ResourceHandle};
use crate::http::{ApiClient, ApiError, AuthApi, DirectorySink, DownloadSink, SessionGuard};
use crate::resources::dashboard::{self, AdminDashboard, PendingSurveyList};
use crate::resources::departments::{self, DepartmentList};
use crate::resources::remarks::{self, CustomerFocus};
use crate::resources::reports::{self, ReportFilter, ReportSelector, SurveyReports};

use super::actors::ActorSet;

/// The admin console's resources, wired like [`UserPortal`](super::UserPortal).
///
/// Customer focus and the reports table have no session precondition; they
/// fetch as soon as the console starts.
pub struct AdminConsole {
    pub session: SessionGuard,
    pub auth: AuthApi,
    /// Admin stats merged with attendance departments.
    pub dashboard: ResourceHandle<AdminDashboard>,
    pub pending: ResourceHandle<PendingSurveyList>,
    pub departments: ResourceHandle<DepartmentList>,
    pub customer_focus: ResourceHandle<CustomerFocus>,
    pub reports: ResourceHandle<SurveyReports>,
    /// Changes the reports query and refetches.
    pub report_filter: ReportSelector,
    pub dispatcher: ActionDispatcher,
    pub exporter: ReportExporter,
    actors: ActorSet,
}

impl AdminConsole {
    pub fn new(client: ApiClient, sink: Arc<dyn DownloadSink>) -> Self {
        let session = client.session().clone();
        let trigger = || FetchTrigger::authenticated(&session);
        let mut actors = ActorSet::new();

        let dashboard = actors.spawn(dashboard::new_admin_dashboard(), client.clone(), trigger());
        let pending = actors.spawn(dashboard::new_pending_surveys(), client.clone(), trigger());
        let departments = actors.spawn(departments::new(), client.clone(), trigger());
        let customer_focus = actors.spawn(remarks::new_customer_focus(), client.clone(), FetchTrigger::always());
        let (reports_actor, reports_handle, report_filter) = reports::new(ReportFilter::default());
        let reports = actors.spawn((reports_actor, reports_handle), client.clone(), FetchTrigger::always());

        let notifier = Notifier::default();
        let dispatcher = ActionDispatcher::new(client.clone(), ActionTargets::default(), notifier.clone());
        let exporter = ReportExporter::new(client.clone(), sink, notifier);

        info!(actors = actors.len(), "Admin console started");
        Self {
            auth: AuthApi::new(client),
            session,
            dashboard,
            pending,
            departments,
            customer_focus,
            reports,
            report_filter,
            dispatcher,
            exporter,
            actors,
        }
    }

    pub fn from_config(config: &PortalConfig) -> Result<Self, ApiError> {
        let client = ApiClient::from_config(config, SessionGuard::new())?;
        Ok(Self::new(client, Arc::new(DirectorySink::new(&config.download_dir))))
    }

    pub async fn shutdown(mut self) -> Result<(), String> {
        info!("Shutting down admin console...");
        // Dropping the handles closes each actor's mailbox.
        let actors = std::mem::take(&mut self.actors);
        drop(self);
        actors.join().await?;
        info!("Admin console shutdown complete.");
        Ok(())
    }
}
