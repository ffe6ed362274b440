//! Request payloads and query strings accepted by the API.

use crate::model::role::Role;
use serde::Deserialize;
use serde_json::Value;

/// `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub code: String,
    pub password: String,
}

/// `POST /auth/register-admin`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterAdminRequest {
    pub code: String,
    pub username: String,
    pub password: String,
}

/// `POST /new`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewChecksheetRequest {
    pub department: String,
    pub model: String,
    pub as_group: String,
    pub machine_no: String,
    #[serde(default)]
    pub checksheet_name: Option<String>,
}

/// `PUT /update/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateChecksheetRequest {
    #[serde(default)]
    pub checksheet_name: Option<String>,
    #[serde(default)]
    pub checksheet_data: Option<Value>,
}

/// `POST /api/save-form`: update when `id` is present, insert otherwise.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveFormRequest {
    #[serde(default)]
    pub id: Option<i64>,
    pub department: String,
    pub model: String,
    pub machine_no: String,
    pub as_group: String,
    #[serde(default)]
    pub checksheet_name: Option<String>,
    #[serde(default)]
    pub checksheet_data: Option<Value>,
    #[serde(default)]
    pub status: Option<String>,
}

/// `GET /search` query string. Every field is optional; empty strings count
/// as omitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChecksheetFilters {
    pub department: Option<String>,
    pub model: Option<String>,
    pub machine_no: Option<String>,
    pub as_group: Option<String>,
    pub checksheet_name: Option<String>,
}

/// `GET /options` query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionsQuery {
    pub department: Option<String>,
    pub model: Option<String>,
}

/// `GET /api/load-form-by-machine` query string.
#[derive(Debug, Clone, Deserialize)]
pub struct MachineSlotQuery {
    pub department: String,
    pub model: String,
    pub machine_no: String,
    pub as_group: String,
    pub checksheet_name: String,
}

/// `POST /users`. Fields are optional at the decoding level so that a missing
/// one is reported as a validation error rather than a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserRequest {
    pub code: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub department: Option<String>,
}

/// `PUT /users/{id}`. The password is only rehashed when one is supplied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub code: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub department: Option<String>,
}

/// `GET /logs` query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogQuery {
    pub user_code: Option<String>,
    pub action_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<u32>,
}

/// `POST /api/admin/machines`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMachineAssignment {
    pub machine_no: String,
    pub model: String,
    pub assigned_form: String,
    #[serde(default)]
    pub department: Option<String>,
}

/// Treats `Some("")` and whitespace-only values like an omitted parameter.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
