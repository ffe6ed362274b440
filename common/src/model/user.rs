use crate::model::role::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The authenticated caller, as carried by the session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub code: String,
    pub username: String,
    pub role: Role,
    pub department: Option<String>,
}

/// Public part of a user account returned after login or creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub code: String,
    pub username: String,
    pub role: Role,
    pub department: Option<String>,
}

/// One row of the user directory, joined with the latest presence event.
///
/// `online` is true when the most recent of `LOGIN_SUCCESS` / `LOGOUT` for the
/// account's code is a login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListing {
    pub id: i64,
    pub code: String,
    pub username: String,
    pub role: Role,
    pub department: Option<String>,
    pub create_at: DateTime<Utc>,
    pub last_action: Option<String>,
    pub last_action_at: Option<DateTime<Utc>>,
    pub online: bool,
}
