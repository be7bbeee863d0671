//! Survey templates and the current user's submissions.

use crate::framework::{ResourceActor, ResourceHandle};
use crate::model::{SurveyData, UserSubmission};

use super::{spawnable, FailureMessage, JsonEndpoint};

pub const ASSIGNED_SURVEYS_PATH: &str = "/api/assigned-surveys";
pub const USER_SUBMISSIONS_PATH: &str = "/api/user-submissions";

pub type AssignedSurveys = JsonEndpoint<Vec<SurveyData>>;
pub type UserSubmissions = JsonEndpoint<Vec<UserSubmission>>;
pub type SurveyById = JsonEndpoint<SurveyData>;

pub fn survey_path(survey_id: i64) -> String {
    format!("/api/surveys/{survey_id}")
}

pub fn assigned_surveys() -> AssignedSurveys {
    JsonEndpoint::new("assigned-surveys", ASSIGNED_SURVEYS_PATH)
        .with_failure(FailureMessage::Fixed("Failed to fetch assigned surveys".into()))
}

pub fn user_submissions() -> UserSubmissions {
    JsonEndpoint::new("user-submissions", USER_SUBMISSIONS_PATH)
        .with_failure(FailureMessage::ServerOr("Failed to load your past surveys.".into()))
}

/// A single survey template with its questions.
pub fn survey_by_id(survey_id: i64) -> SurveyById {
    JsonEndpoint::new("survey", survey_path(survey_id))
        .with_failure(FailureMessage::ServerOr(format!("Failed to load survey with ID {survey_id}.")))
}

pub fn new_assigned() -> (ResourceActor<AssignedSurveys>, ResourceHandle<AssignedSurveys>) {
    spawnable(assigned_surveys())
}

pub fn new_submissions() -> (ResourceActor<UserSubmissions>, ResourceHandle<UserSubmissions>) {
    spawnable(user_submissions())
}

pub fn new_survey(survey_id: i64) -> (ResourceActor<SurveyById>, ResourceHandle<SurveyById>) {
    spawnable(survey_by_id(survey_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockTransport;
    use crate::framework::{FetchState, FetchTrigger};
    use crate::http::SessionGuard;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn survey_by_id_reports_server_detail() {
        let mock = Arc::new(MockTransport::new());
        mock.expect_get("/api/surveys/42").return_status(404, json!({"detail": "Survey not found"}));

        let (actor, handle) = new_survey(42);
        tokio::spawn(actor.run(mock.client(SessionGuard::new()), FetchTrigger::always()));

        let snapshot = handle.settled().await.unwrap();
        assert_eq!(snapshot.state, FetchState::Error);
        assert_eq!(snapshot.error.as_deref(), Some("Survey not found"));
    }

    #[tokio::test]
    async fn survey_by_id_falls_back_on_network_error() {
        let mock = Arc::new(MockTransport::new());
        mock.expect_get("/api/surveys/3").return_network_error("reset");

        let (actor, handle) = new_survey(3);
        tokio::spawn(actor.run(mock.client(SessionGuard::new()), FetchTrigger::always()));

        let snapshot = handle.settled().await.unwrap();
        assert_eq!(snapshot.error.as_deref(), Some("Failed to load survey with ID 3."));
    }

    #[tokio::test]
    async fn assigned_surveys_decode() {
        let mock = Arc::new(MockTransport::new());
        mock.expect_get(ASSIGNED_SURVEYS_PATH).return_json(json!([
            {"id": 1, "title": "IT satisfaction", "rated_department_id": 4, "questions": []}
        ]));

        let (actor, handle) = new_assigned();
        tokio::spawn(actor.run(mock.client(SessionGuard::new()), FetchTrigger::always()));

        let value = handle.settled().await.unwrap().value.unwrap();
        assert_eq!(value[0].rated_department_id, 4);
    }
}
