//! Survey templates, submissions and drafts.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Rating,
    Text,
    MultipleChoice,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: i64,
    pub text: String,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionData {
    pub id: i64,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub order: i32,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
}

/// A survey the current user is assigned to fill in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyData {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub rated_dept_name: Option<String>,
    #[serde(default)]
    pub managing_dept_name: Option<String>,
    pub rated_department_id: i64,
    #[serde(default)]
    pub managing_department_id: Option<i64>,
    #[serde(default)]
    pub questions: Vec<QuestionData>,
}

/// A survey the current user has already submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSubmission {
    pub id: i64,
    pub survey_id: i64,
    pub submitter_user_id: i64,
    #[serde(default)]
    pub submitter_department_id: Option<i64>,
    pub rated_department_id: i64,
    #[serde(default)]
    pub submitted_at: Option<String>,
    #[serde(default)]
    pub overall_customer_rating: Option<f64>,
    #[serde(default)]
    pub suggestions: Option<String>,
    #[serde(default)]
    pub submitter_department_name: Option<String>,
    #[serde(default)]
    pub rated_department_name: Option<String>,
}

/// One answer as held by the survey form. A rating of 0 means "not rated yet".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyAnswer {
    pub id: i64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    pub rating: u8,
    #[serde(default)]
    pub remarks: String,
}

impl SurveyAnswer {
    pub fn unrated(id: i64) -> Self {
        Self { id, category: None, question: None, rating: 0, remarks: String::new() }
    }

    pub fn rated(id: i64, rating: u8, remarks: impl Into<String>) -> Self {
        Self { id, category: None, question: None, rating, remarks: remarks.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmittedAnswer {
    pub id: i64,
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// Body of `POST /api/surveys/{id}/submit_response`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveySubmission {
    pub user_id: i64,
    pub answers: Vec<SubmittedAnswer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Body of `POST /api/surveys/{id}/save_draft`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftPayload {
    pub answers: Vec<SurveyAnswer>,
    pub suggestion: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rated_department_id: Option<i64>,
}

/// A saved answer. Text-only answers carry no rating.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DraftAnswer {
    pub id: i64,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub remarks: String,
}

/// A previously saved draft. The backend answers `{}` when there is none.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyDraft {
    #[serde(default)]
    pub answers: Vec<DraftAnswer>,
    #[serde(default)]
    pub final_suggestion: String,
}

impl SurveyDraft {
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty() && self.final_suggestion.is_empty()
    }

    /// Overlays the draft onto a fresh form, question by question.
    pub fn restore(&self, questions: &[QuestionData]) -> Vec<SurveyAnswer> {
        questions
            .iter()
            .map(|q| {
                let saved = self.answers.iter().find(|a| a.id == q.id);
                SurveyAnswer {
                    id: q.id,
                    category: q.category.clone(),
                    question: Some(q.text.clone()),
                    rating: saved.and_then(|a| a.rating).unwrap_or(0),
                    remarks: saved.map(|a| a.remarks.clone()).unwrap_or_default(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn question(id: i64) -> QuestionData {
        QuestionData {
            id,
            text: format!("Question {id}"),
            kind: QuestionType::Rating,
            order: id as i32,
            category: Some("QUALITY".into()),
            options: Vec::new(),
        }
    }

    #[test]
    fn empty_object_is_an_empty_draft() {
        let draft: SurveyDraft = serde_json::from_value(json!({})).unwrap();
        assert!(draft.is_empty());
    }

    #[test]
    fn restore_overlays_saved_answers() {
        let draft: SurveyDraft = serde_json::from_value(json!({
            "answers": [{ "id": 2, "rating": 1, "remarks": "late parts" }],
            "finalSuggestion": "more reviews"
        }))
        .unwrap();

        let answers = draft.restore(&[question(1), question(2)]);
        assert_eq!(answers[0].rating, 0);
        assert_eq!(answers[1].rating, 1);
        assert_eq!(answers[1].remarks, "late parts");
        assert_eq!(draft.final_suggestion, "more reviews");
    }

    #[test]
    fn text_only_answer_restores_as_unrated() {
        let draft: SurveyDraft = serde_json::from_value(json!({
            "answers": [{ "id": 1, "rating": null, "remarks": "see attachment" }, { "id": 2, "rating": 4 }],
            "finalSuggestion": ""
        }))
        .unwrap();

        let answers = draft.restore(&[question(1), question(2)]);
        assert_eq!(answers[0].rating, 0);
        assert_eq!(answers[0].remarks, "see attachment");
        assert_eq!(answers[1].rating, 4);
    }

    #[test]
    fn submission_omits_empty_optionals() {
        let submission = SurveySubmission {
            user_id: 1,
            answers: vec![SubmittedAnswer { id: 1, rating: 5, remarks: None }],
            suggestion: None,
        };
        assert_eq!(
            serde_json::to_value(&submission).unwrap(),
            json!({ "user_id": 1, "answers": [{ "id": 1, "rating": 5 }] })
        );
    }
}
