use std::sync::Arc;

use tracing::info;

use crate::actions::{ActionDispatcher, ActionTargets, Notifier, ReportExporter};
use crate::config::PortalConfig;
use crate::framework::{FetchTrigger, ResourceHandle};
use crate::http::{ApiClient, ApiError, AuthApi, DirectorySink, DownloadSink, SessionGuard};
use crate::resources::dashboard::{self, DepartmentRatings};
use crate::resources::departments::{self, PopulatedDepartmentList};
use crate::resources::remarks::{self, IncomingRemarks, OutgoingRemarks};
use crate::resources::surveys::{self, AssignedSurveys, SurveyById, UserSubmissions};

use super::actors::ActorSet;
use super::orchestrator::GateFailures;

/// Everything the end-user portal needs, wired together.
///
/// `UserPortal` is responsible for:
/// - **Lifecycle Management**: Starting every resource actor and stopping them on shutdown
/// - **Dependency Wiring**: One shared [`ApiClient`] and [`SessionGuard`], injected into each actor
/// - **Triggers**: Every resource waits for an authenticated session before its first fetch
///
/// # Example
///
/// ```ignore
/// let portal = UserPortal::from_config(&PortalConfig::from_env()?)?;
/// portal.auth.verify().await?;
///
/// let ratings = portal.ratings.settled().await?;
/// portal.shutdown().await?;
/// ```
pub struct UserPortal {
    pub session: SessionGuard,
    pub auth: AuthApi,
    /// Departments, gated by the populate-surveys call.
    pub departments: ResourceHandle<PopulatedDepartmentList>,
    pub ratings: ResourceHandle<DepartmentRatings>,
    pub assigned: ResourceHandle<AssignedSurveys>,
    pub submissions: ResourceHandle<UserSubmissions>,
    pub incoming: ResourceHandle<IncomingRemarks>,
    pub outgoing: ResourceHandle<OutgoingRemarks>,
    pub dispatcher: ActionDispatcher,
    pub exporter: ReportExporter,
    pub gate_failures: GateFailures,
    client: ApiClient,
    actors: ActorSet,
}

impl UserPortal {
    pub fn new(client: ApiClient, sink: Arc<dyn DownloadSink>) -> Self {
        let session = client.session().clone();
        let trigger = || FetchTrigger::authenticated(&session);
        let mut actors = ActorSet::new();

        let (departments_actor, departments_handle, gate_failures) = departments::new_populated();
        let departments = actors.spawn((departments_actor, departments_handle), client.clone(), trigger());
        let ratings = actors.spawn(dashboard::new_department_ratings(), client.clone(), trigger());
        let assigned = actors.spawn(surveys::new_assigned(), client.clone(), trigger());
        let submissions = actors.spawn(surveys::new_submissions(), client.clone(), trigger());
        let incoming = actors.spawn(remarks::new_incoming(), client.clone(), trigger());
        let outgoing = actors.spawn(remarks::new_outgoing(), client.clone(), trigger());

        let notifier = Notifier::default();
        let targets = ActionTargets {
            submissions: Some(submissions.clone()),
            ratings: Some(ratings.clone()),
            incoming: Some(incoming.clone()),
            outgoing: Some(outgoing.clone()),
        };
        let dispatcher = ActionDispatcher::new(client.clone(), targets, notifier.clone());
        let exporter = ReportExporter::new(client.clone(), sink, notifier);

        info!(actors = actors.len(), "User portal started");
        Self {
            auth: AuthApi::new(client.clone()),
            session,
            departments,
            ratings,
            assigned,
            submissions,
            incoming,
            outgoing,
            dispatcher,
            exporter,
            gate_failures,
            client,
            actors,
        }
    }

    /// Builds the reqwest-backed client and a directory sink from `config`.
    pub fn from_config(config: &PortalConfig) -> Result<Self, ApiError> {
        let client = ApiClient::from_config(config, SessionGuard::new())?;
        Ok(Self::new(client, Arc::new(DirectorySink::new(&config.download_dir))))
    }

    /// Starts a resource for one survey template. It lives until shutdown.
    pub fn open_survey(&mut self, survey_id: i64) -> ResourceHandle<SurveyById> {
        let trigger = FetchTrigger::authenticated(&self.session);
        self.actors.spawn(surveys::new_survey(survey_id), self.client.clone(), trigger)
    }

    /// Drops every handle this portal holds and waits for the actors to exit.
    ///
    /// Handles cloned out of the portal keep their actor alive; drop them first.
    pub async fn shutdown(mut self) -> Result<(), String> {
        info!("Shutting down user portal...");
        // Dropping the handles closes each actor's mailbox.
        let actors = std::mem::take(&mut self.actors);
        drop(self);
        actors.join().await?;
        info!("User portal shutdown complete.");
        Ok(())
    }
}
