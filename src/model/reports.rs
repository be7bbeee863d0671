use serde::{Deserialize, Serialize};

/// One row of the admin survey-reports table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyReportRow {
    pub id: i64,
    #[serde(default)]
    pub from_department: String,
    #[serde(default)]
    pub to_department: String,
    #[serde(default)]
    pub date: String,
    #[serde(default, rename = "avgRating")]
    pub avg_rating: Option<f64>,
    #[serde(default)]
    pub remark: String,
}
