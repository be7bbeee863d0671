//! Remarks exchanged between departments after low ratings.

use serde::{Deserialize, Deserializer, Serialize};

/// Row of the admin "Customer Focus" action-plan table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerFocusItem {
    pub id: String,
    #[serde(default)]
    pub survey_date: String,
    #[serde(default)]
    pub department: String,
    #[serde(default, rename = "fromDepartment")]
    pub from_department: Option<String>,
    #[serde(default, rename = "toDepartment")]
    pub to_department: Option<String>,
    #[serde(default)]
    pub remark: String,
    #[serde(default)]
    pub action_plan: String,
    #[serde(default)]
    pub responsible_person: String,
    #[serde(default)]
    pub target_date: String,
}

/// A low rating received by the user's department that still needs a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingFeedback {
    pub id: i64,
    pub from_department: String,
    pub rating_given: u8,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TheirResponse {
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub action_plan: Option<String>,
    #[serde(default)]
    pub responsible_person: Option<String>,
}

/// A low rating the user's department gave, together with the other side's answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingFeedback {
    pub id: i64,
    pub department: String,
    pub rating: u8,
    #[serde(default)]
    pub your_remark: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub their_response: TheirResponse,
    #[serde(default, deserialize_with = "null_as_default")]
    pub acknowledged: bool,
}

/// Reads `null` as the type's default; the backend leaves unset columns null.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of `POST /api/remarks/respond`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemarkResponse {
    pub id: i64,
    pub explanation: String,
    pub action_plan: String,
    pub responsible_person: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_acknowledged_reads_as_false() {
        let items: Vec<OutgoingFeedback> = serde_json::from_value(json!([
            {"id": 1, "department": "HR", "rating": 2, "acknowledged": null},
            {"id": 2, "department": "IT", "rating": 1, "acknowledged": true},
            {"id": 3, "department": "QA", "rating": 2}
        ]))
        .unwrap();

        let flags: Vec<bool> = items.iter().map(|f| f.acknowledged).collect();
        assert_eq!(flags, vec![false, true, false]);
    }
}
