use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Actions that leave a row in the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    LoginSuccess,
    LoginFailure,
    Logout,
    CreateChecksheet,
    CreateChecksheetData,
    UpdateChecksheet,
    DeleteChecksheet,
    CreateUser,
    UpdateUser,
    DeleteUser,
    CreateMachine,
    DeleteMachine,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::LoginSuccess => "LOGIN_SUCCESS",
            ActionType::LoginFailure => "LOGIN_FAILURE",
            ActionType::Logout => "LOGOUT",
            ActionType::CreateChecksheet => "CREATE_CHECKSHEET",
            ActionType::CreateChecksheetData => "CREATE_CHECKSHEET_DATA",
            ActionType::UpdateChecksheet => "UPDATE_CHECKSHEET",
            ActionType::DeleteChecksheet => "DELETE_CHECKSHEET",
            ActionType::CreateUser => "CREATE_USER",
            ActionType::UpdateUser => "UPDATE_USER",
            ActionType::DeleteUser => "DELETE_USER",
            ActionType::CreateMachine => "CREATE_MACHINE",
            ActionType::DeleteMachine => "DELETE_MACHINE",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored audit row. `action_type` stays a string so rows written by older
/// builds with other action names still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLog {
    pub id: i64,
    pub user_code: String,
    pub username: String,
    pub action_type: String,
    pub target_id: Option<String>,
    pub details: Option<String>,
    pub ip_address: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_serde() {
        let json = serde_json::to_string(&ActionType::CreateChecksheetData).unwrap();
        assert_eq!(json, format!("\"{}\"", ActionType::CreateChecksheetData));
    }
}
