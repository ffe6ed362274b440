use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status a record starts with until a form writes another one.
pub const DEFAULT_STATUS: &str = "prepare";

/// A stored checksheet: the slot it fills plus the free-form field values.
///
/// `checksheet_data` has no fixed shape; the server never looks inside it
/// beyond deciding whether it is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checksheet {
    pub id: i64,
    pub department: String,
    pub model: String,
    pub machine_no: String,
    pub as_group: String,
    pub checksheet_name: Option<String>,
    pub checksheet_data: Option<Value>,
    pub hash: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Checksheet {
    pub fn has_data(&self) -> bool {
        has_data(self.checksheet_data.as_ref())
    }
}

/// Search result row: the record without its payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecksheetSummary {
    pub id: i64,
    pub department: String,
    pub model: String,
    pub machine_no: String,
    pub as_group: String,
    pub checksheet_name: Option<String>,
    pub status: String,
    pub has_data: bool,
}

/// Distinct dropdown values for the search panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChecksheetOptions {
    pub departments: Vec<String>,
    pub models: Vec<String>,
    pub machines: Vec<String>,
    #[serde(rename = "asGroups")]
    pub as_groups: Vec<String>,
}

/// A payload counts as data unless it is missing, JSON `null` or `{}`.
pub fn has_data(payload: Option<&Value>) -> bool {
    match payload {
        None | Some(Value::Null) => false,
        Some(Value::Object(map)) => !map.is_empty(),
        Some(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_payloads_have_no_data() {
        assert!(!has_data(None));
        assert!(!has_data(Some(&Value::Null)));
        assert!(!has_data(Some(&json!({}))));
    }

    #[test]
    fn anything_else_has_data() {
        assert!(has_data(Some(&json!({"temp": 21}))));
        assert!(has_data(Some(&json!([]))));
        assert!(has_data(Some(&json!(""))));
    }
}
