use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Machine number reported for forms that are not bound to a machine.
pub const UNKNOWN_MACHINE: &str = "UNKNOWN";

/// Department given to machine assignments created without one.
pub const DEFAULT_ASSIGNMENT_DEPARTMENT: &str = "ASSEMBLY";

/// Contents of a template's `meta.json` sidecar.
///
/// `error` is set instead of failing the listing when the sidecar exists but
/// cannot be parsed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksheet_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Admin view of a template folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateListing {
    pub folder_name: String,
    pub meta: Option<TemplateMeta>,
    pub has_meta: bool,
    pub url: String,
}

/// A database row binding a machine to a template folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineAssignment {
    pub id: i64,
    pub machine_no: String,
    pub model: String,
    pub assigned_form: String,
    pub department: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One fillable form offered to the caller.
///
/// Either bound to a machine through an assignment, or generic with
/// `machine_no` set to [`UNKNOWN_MACHINE`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableForm {
    pub id: String,
    pub name: String,
    pub label: String,
    pub path: String,
    pub machine_no: String,
    pub model: Option<String>,
    pub department: Option<String>,
    pub as_group: Option<String>,
    pub version: Option<String>,
}

impl AvailableForm {
    pub fn is_generic(&self) -> bool {
        self.machine_no == UNKNOWN_MACHINE
    }
}
