//! Append-only activity log.
//!
//! Writes are best effort. A failed insert is reported through `log::error!`
//! and otherwise ignored: the business operation the row describes has already
//! committed and is not rolled back, and the HTTP caller never sees the
//! failure. The mutation and its audit row are two separate commits.

use crate::db::Database;
use crate::error::ApiError;
use actix_web::HttpRequest;
use chrono::Utc;
use common::model::activity::ActionType;
use common::model::user::Identity;
use log::error;
use rusqlite::{params, Connection};
use serde_json::Value;

const SYSTEM_CODE: &str = "system";
const SYSTEM_NAME: &str = "System";

/// One audit row waiting to be written.
#[derive(Debug, Clone)]
pub struct Activity {
    pub user_code: Option<String>,
    pub username: Option<String>,
    pub action_type: ActionType,
    pub target_id: Option<String>,
    pub details: Option<Value>,
    pub ip_address: String,
}

impl Activity {
    pub fn new(action_type: ActionType, req: &HttpRequest) -> Self {
        Activity {
            user_code: None,
            username: None,
            action_type,
            target_id: None,
            details: None,
            ip_address: caller_ip(req),
        }
    }

    pub fn by(mut self, actor: &Identity) -> Self {
        self.user_code = Some(actor.code.clone());
        self.username = Some(actor.username.clone());
        self
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.user_code = Some(code.into());
        self
    }

    pub fn target(mut self, target_id: impl ToString) -> Self {
        self.target_id = Some(target_id.to_string());
        self
    }

    pub fn details(mut self, details: impl Into<Value>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Strings are stored verbatim, anything structured as compact JSON.
fn details_text(details: Option<&Value>) -> Option<String> {
    match details {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}

/// Raw `X-Forwarded-For` when a proxy set it, the peer address otherwise.
pub fn caller_ip(req: &HttpRequest) -> String {
    req.headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| req.peer_addr().map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Inserts one row. Missing actors are recorded as the system account.
pub fn insert(conn: &Connection, activity: &Activity) -> Result<i64, ApiError> {
    conn.execute(
        "INSERT INTO activity_logs (user_code, username, action_type, target_id, details, ip_address, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            activity.user_code.as_deref().unwrap_or(SYSTEM_CODE),
            activity.username.as_deref().unwrap_or(SYSTEM_NAME),
            activity.action_type.as_str(),
            activity.target_id,
            details_text(activity.details.as_ref()),
            activity.ip_address,
            Utc::now(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

#[derive(Clone, Debug)]
pub struct AuditLog {
    db: Database,
}

impl AuditLog {
    pub fn new(db: Database) -> Self {
        AuditLog { db }
    }

    /// Appends `activity`, swallowing any failure after logging it.
    pub async fn record(&self, activity: Activity) {
        let action = activity.action_type;
        if let Err(e) = self.db.run(move |conn| insert(conn, &activity)).await {
            error!("Failed to record {} activity: {}", action, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::temp_database;
    use actix_web::test::TestRequest;
    use common::model::role::Role;
    use serde_json::json;

    fn stored(db: &Database) -> Vec<(String, String, String, Option<String>, Option<String>, String)> {
        let conn = db.connect().unwrap();
        let mut stmt = conn
            .prepare("SELECT user_code, username, action_type, target_id, details, ip_address FROM activity_logs ORDER BY id")
            .unwrap();
        stmt.query_map([], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
            ))
        })
        .unwrap()
        .map(Result::unwrap)
        .collect()
    }

    #[actix_web::test]
    async fn missing_actor_defaults_to_system() {
        let (_dir, db) = temp_database();
        let req = TestRequest::default().to_http_request();
        AuditLog::new(db.clone())
            .record(Activity::new(ActionType::LoginFailure, &req).details("Invalid code or password"))
            .await;

        let rows = stored(&db);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, "system");
        assert_eq!(rows[0].1, "System");
        assert_eq!(rows[0].2, "LOGIN_FAILURE");
        assert_eq!(rows[0].4.as_deref(), Some("Invalid code or password"));
    }

    #[actix_web::test]
    async fn structured_details_are_serialized() {
        let (_dir, db) = temp_database();
        let req = TestRequest::default()
            .insert_header(("x-forwarded-for", "10.0.0.7"))
            .to_http_request();
        let actor = Identity {
            id: 1,
            code: "A001".into(),
            username: "Admin".into(),
            role: Role::Admin,
            department: None,
        };
        AuditLog::new(db.clone())
            .record(
                Activity::new(ActionType::CreateChecksheet, &req)
                    .by(&actor)
                    .target(42)
                    .details(json!({"model": "AL40G"})),
            )
            .await;

        let rows = stored(&db);
        assert_eq!(rows[0].0, "A001");
        assert_eq!(rows[0].3.as_deref(), Some("42"));
        assert_eq!(rows[0].4.as_deref(), Some(r#"{"model":"AL40G"}"#));
        assert_eq!(rows[0].5, "10.0.0.7");
    }

    #[actix_web::test]
    async fn write_failures_are_swallowed() {
        let (dir, db) = temp_database();
        db.connect()
            .unwrap()
            .execute_batch("DROP TABLE activity_logs;")
            .unwrap();
        let req = TestRequest::default().to_http_request();
        // Must return normally even though the insert fails.
        AuditLog::new(db).record(Activity::new(ActionType::Logout, &req)).await;
        drop(dir);
    }

    #[test]
    fn ip_falls_back_to_unknown() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(caller_ip(&req), "unknown");
    }
}
