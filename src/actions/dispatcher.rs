//! User-triggered mutations and the resource updates that follow them.
//!
//! Every operation validates locally first, then calls the backend, then
//! updates exactly the resources it affects (a refresh or a local patch) and
//! publishes a [`Notification`]. A failure at any step leaves resources as
//! they were and is both returned and published.

use serde_json::{json, Value};
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

use crate::framework::{FrameworkError, RemoteResource, ResourceHandle};
use crate::http::{ApiClient, ApiError};
use crate::model::{DraftPayload, MessageResponse, OutgoingFeedback, PasswordUpdate, SurveyAnswer, SurveyDraft, SurveySubmission};
use crate::resources::dashboard::DepartmentRatings;
use crate::resources::remarks::{IncomingRemarks, OutgoingPatch, OutgoingRemarks};
use crate::resources::surveys::UserSubmissions;

use super::error::ActionError;
use super::validation::{non_blank, submitted_answers, validate_survey, PasswordForm, RemarkResponseForm};

pub const NOTIFICATION_CAPACITY: usize = 64;

pub const RESPOND_PATH: &str = "/api/remarks/respond";
pub const ACKNOWLEDGE_PATH: &str = "/api/remarks/acknowledge";

pub fn submit_path(survey_id: i64) -> String {
    format!("/api/surveys/{survey_id}/submit_response")
}

pub fn save_draft_path(survey_id: i64) -> String {
    format!("/api/surveys/{survey_id}/save_draft")
}

pub fn draft_path(survey_id: i64) -> String {
    format!("/api/surveys/{survey_id}/draft")
}

pub fn password_path(user_id: i64) -> String {
    format!("/api/users/{user_id}/password")
}

// =============================================================================
// NOTIFICATIONS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Failure,
}

/// What a UI would show as a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

/// Broadcasts notifications. Sending with no subscriber is not an error.
#[derive(Clone)]
pub struct Notifier {
    sender: broadcast::Sender<Notification>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(NOTIFICATION_CAPACITY)
    }
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    pub fn success(&self, title: &str, message: impl Into<String>) {
        self.send(NotificationKind::Success, title, message.into());
    }

    pub fn failure(&self, title: &str, message: impl Into<String>) {
        self.send(NotificationKind::Failure, title, message.into());
    }

    /// Publishes `error` with a title matching its kind.
    pub fn error(&self, error: &ActionError) {
        let title = match error {
            ActionError::Validation(v) => v.title(),
            _ => "Error",
        };
        self.failure(title, error.to_string());
    }

    fn send(&self, kind: NotificationKind, title: &str, message: String) {
        let _ = self.sender.send(Notification { kind, title: title.to_owned(), message });
    }
}

// =============================================================================
// DISPATCHER
// =============================================================================

/// Resources an action may refresh or patch. Absent handles are skipped.
#[derive(Clone, Default)]
pub struct ActionTargets {
    pub submissions: Option<ResourceHandle<UserSubmissions>>,
    pub ratings: Option<ResourceHandle<DepartmentRatings>>,
    pub incoming: Option<ResourceHandle<IncomingRemarks>>,
    pub outgoing: Option<ResourceHandle<OutgoingRemarks>>,
}

/// Outgoing list after an acknowledgement, with the selection kept in bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct AcknowledgeOutcome {
    pub remaining: Vec<OutgoingFeedback>,
    pub selected: usize,
}

/// Largest valid index for a list of `len` items, or 0 when empty.
pub fn clamp_selection(selected: usize, len: usize) -> usize {
    selected.min(len.saturating_sub(1))
}

#[derive(Clone)]
pub struct ActionDispatcher {
    client: ApiClient,
    targets: ActionTargets,
    notifier: Notifier,
}

impl ActionDispatcher {
    pub fn new(client: ApiClient, targets: ActionTargets, notifier: Notifier) -> Self {
        Self { client, targets, notifier }
    }

    pub fn notifications(&self) -> broadcast::Receiver<Notification> {
        self.notifier.subscribe()
    }

    #[instrument(skip(self, answers, suggestion))]
    pub async fn submit_survey(&self, survey_id: i64, answers: &[SurveyAnswer], suggestion: &str) -> Result<(), ActionError> {
        let result = self.try_submit_survey(survey_id, answers, suggestion).await;
        self.report(result)
    }

    async fn try_submit_survey(&self, survey_id: i64, answers: &[SurveyAnswer], suggestion: &str) -> Result<(), ActionError> {
        validate_survey(answers)?;
        let submission = SurveySubmission {
            user_id: self.current_user_id()?,
            answers: submitted_answers(answers),
            suggestion: non_blank(suggestion),
        };
        debug!(?submission, "Submitting survey");
        let _: Value = self.client.post_json(&submit_path(survey_id), &submission).await?;

        info!(survey_id, "Survey submitted");
        refresh(self.targets.submissions.as_ref()).await;
        refresh(self.targets.ratings.as_ref()).await;
        self.notifier.success("Submitted!", "Your survey has been submitted.");
        Ok(())
    }

    #[instrument(skip(self, answers, suggestion))]
    pub async fn save_draft(
        &self,
        survey_id: i64,
        answers: &[SurveyAnswer],
        suggestion: &str,
        rated_department_id: Option<i64>,
    ) -> Result<(), ActionError> {
        let payload = DraftPayload {
            answers: answers.to_vec(),
            suggestion: suggestion.to_owned(),
            rated_department_id,
        };
        let result: Result<Value, ApiError> = self.client.post_json(&save_draft_path(survey_id), &payload).await;
        self.report(result.map_err(ActionError::from))?;
        self.notifier.success("Draft Saved", "You can resume this survey later.");
        Ok(())
    }

    /// The saved draft, or `None` when the backend has none (`{}` or 404).
    #[instrument(skip(self))]
    pub async fn load_draft(&self, survey_id: i64) -> Result<Option<SurveyDraft>, ActionError> {
        let body: Value = match self.client.get_json(&draft_path(survey_id)).await {
            Ok(body) => body,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => {
                warn!(error = %e, "Draft not loaded");
                return Err(e.into());
            }
        };
        if body.is_null() || body.as_object().is_some_and(|o| o.is_empty()) {
            return Ok(None);
        }
        let draft: SurveyDraft = serde_json::from_value(body).map_err(ApiError::from)?;
        Ok((!draft.is_empty()).then_some(draft))
    }

    #[instrument(skip(self, form))]
    pub async fn respond_to_remark(&self, feedback_id: i64, form: &RemarkResponseForm) -> Result<(), ActionError> {
        let result = self.try_respond_to_remark(feedback_id, form).await;
        self.report(result)
    }

    async fn try_respond_to_remark(&self, feedback_id: i64, form: &RemarkResponseForm) -> Result<(), ActionError> {
        let response = form.validate(feedback_id)?;
        let _: Value = self.client.post_json(RESPOND_PATH, &response).await?;

        info!(feedback_id, "Remark answered");
        refresh(self.targets.incoming.as_ref()).await;
        refresh(self.targets.outgoing.as_ref()).await;
        self.notifier.success("Response Submitted", "Your response has been submitted successfully.");
        Ok(())
    }

    /// Acknowledges outgoing feedback and drops it from the cached list.
    ///
    /// When the cached list cannot be patched (still loading, or already
    /// without the item) it is refetched instead and the outcome is built from
    /// the fresh list.
    #[instrument(skip(self))]
    pub async fn acknowledge_remark(&self, feedback_id: i64, selected: usize) -> Result<AcknowledgeOutcome, ActionError> {
        let result = self.try_acknowledge_remark(feedback_id, selected).await;
        self.report(result)
    }

    async fn try_acknowledge_remark(&self, feedback_id: i64, selected: usize) -> Result<AcknowledgeOutcome, ActionError> {
        let Some(outgoing) = self.targets.outgoing.as_ref() else {
            return Err(FrameworkError::NotReady("outgoing-remarks".into()).into());
        };
        let _: Value = self.client.post_json(ACKNOWLEDGE_PATH, &json!({ "id": feedback_id })).await?;
        info!(feedback_id, "Feedback acknowledged");
        self.notifier.success(
            "Feedback Acknowledged",
            format!("Outgoing feedback ID {feedback_id} has been acknowledged."),
        );

        let remaining = match outgoing.patch(OutgoingPatch::Remove(feedback_id)).await {
            Ok(remaining) => remaining,
            Err(e) => {
                debug!(feedback_id, error = %e, "Local patch not applied, refetching");
                refetch_outgoing(outgoing).await
            }
        };
        let selected = clamp_selection(selected, remaining.len());
        Ok(AcknowledgeOutcome { remaining, selected })
    }

    #[instrument(skip(self, form))]
    pub async fn change_password(&self, user_id: i64, form: &PasswordForm) -> Result<(), ActionError> {
        let result = self.try_change_password(user_id, form).await;
        self.report(result)
    }

    async fn try_change_password(&self, user_id: i64, form: &PasswordForm) -> Result<(), ActionError> {
        form.validate()?;
        let update = PasswordUpdate {
            current_password: form.current_password.clone(),
            new_password: form.new_password.clone(),
        };
        let response: MessageResponse = self.client.put_json(&password_path(user_id), &update).await?;
        info!(user_id, "Password changed");
        self.notifier.success(
            "Password Updated",
            response.message.unwrap_or_else(|| "Your password has been changed successfully".into()),
        );
        Ok(())
    }

    fn current_user_id(&self) -> Result<i64, ActionError> {
        self.client
            .session()
            .current()
            .user
            .map(|user| user.id)
            .ok_or_else(|| FrameworkError::NotReady("no signed-in user".into()).into())
    }

    fn report<T>(&self, result: Result<T, ActionError>) -> Result<T, ActionError> {
        if let Err(e) = &result {
            warn!(error = %e, validation = e.is_validation(), "Action failed");
            self.notifier.error(e);
        }
        result
    }
}

/// Issues a follow-up refresh. The mutation already succeeded, so a refresh
/// that cannot be issued is only logged.
async fn refresh<R: RemoteResource>(handle: Option<&ResourceHandle<R>>) {
    let Some(handle) = handle else { return };
    if let Err(e) = handle.refresh().await {
        warn!(error = %e, "Follow-up refresh not issued");
    }
}

/// Refetches the outgoing list after a successful acknowledgement. A refetch
/// that fails leaves its error on the resource and yields an empty list here.
async fn refetch_outgoing(outgoing: &ResourceHandle<OutgoingRemarks>) -> Vec<OutgoingFeedback> {
    match outgoing.refresh_and_wait().await {
        Ok(snapshot) => {
            if let Some(error) = &snapshot.error {
                warn!(%error, "Outgoing list not reloaded");
            }
            snapshot.value.unwrap_or_default()
        }
        Err(e) => {
            warn!(error = %e, "Outgoing list not reloaded");
            Vec::new()
        }
    }
}
