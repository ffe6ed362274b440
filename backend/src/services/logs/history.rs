//! # Activity History Query
//!
//! Builds the `activity_logs` query behind `GET /logs`. Filters are optional
//! and combine with AND; the result is always bounded by a clamped limit.

use crate::error::ApiError;
use common::model::activity::ActivityLog;
use common::requests::{non_empty, LogQuery};
use rusqlite::{params_from_iter, Connection};

pub const DEFAULT_LIMIT: u32 = 100;
pub const MAX_LIMIT: u32 = 1000;

/// A bare date as the upper bound covers that whole day.
fn end_of_day(end_date: &str) -> String {
    if end_date.contains(' ') {
        end_date.to_string()
    } else {
        format!("{} 23:59:59", end_date)
    }
}

/// Filtered audit rows, newest first. Timestamps are stored as
/// `YYYY-MM-DD HH:MM:SS...` text, so date bounds compare as strings.
pub fn query(conn: &Connection, filter: &LogQuery) -> Result<Vec<ActivityLog>, ApiError> {
    let mut clauses = String::new();
    let mut params: Vec<String> = Vec::new();
    let mut push = |clause: &str, value: String| {
        params.push(value);
        clauses.push_str(&format!(" AND {} ?{}", clause, params.len()));
    };

    if let Some(code) = non_empty(&filter.user_code) {
        push("user_code =", code.to_string());
    }
    if let Some(action) = non_empty(&filter.action_type) {
        push("action_type =", action.to_string());
    }
    if let Some(start) = non_empty(&filter.start_date) {
        push("created_at >=", start.to_string());
    }
    if let Some(end) = non_empty(&filter.end_date) {
        push("created_at <=", end_of_day(end));
    }

    let limit = filter.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let sql = format!(
        "SELECT id, user_code, username, action_type, target_id, details, ip_address, created_at \
         FROM activity_logs WHERE 1=1{} ORDER BY created_at DESC, id DESC LIMIT {}",
        clauses, limit
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(params.iter()), |row| {
        Ok(ActivityLog {
            id: row.get(0)?,
            user_code: row.get(1)?,
            username: row.get(2)?,
            action_type: row.get(3)?,
            target_id: row.get(4)?,
            details: row.get(5)?,
            ip_address: row.get(6)?,
            created_at: row.get(7)?,
        })
    })?;
    Ok(rows.collect::<Result<_, _>>()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::temp_database;
    use chrono::{TimeZone, Utc};
    use rusqlite::params;

    fn seed(conn: &Connection, code: &str, action: &str, day: u32, hour: u32) {
        let at = Utc.with_ymd_and_hms(2026, 3, day, hour, 30, 0).unwrap();
        conn.execute(
            "INSERT INTO activity_logs (user_code, username, action_type, ip_address, created_at) \
             VALUES (?1, ?1, ?2, '127.0.0.1', ?3)",
            params![code, action, at],
        )
        .unwrap();
    }

    fn seeded() -> (tempfile::TempDir, Connection) {
        let (dir, db) = temp_database();
        let conn = db.connect().unwrap();
        seed(&conn, "E001", "LOGIN_SUCCESS", 1, 8);
        seed(&conn, "E001", "LOGOUT", 1, 17);
        seed(&conn, "A001", "CREATE_USER", 2, 9);
        seed(&conn, "E001", "LOGIN_SUCCESS", 3, 23);
        (dir, conn)
    }

    #[test]
    fn newest_first_without_filters() {
        let (_dir, conn) = seeded();
        let rows = query(&conn, &LogQuery::default()).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].created_at.format("%d").to_string(), "03");
        assert_eq!(rows[3].action_type, "LOGIN_SUCCESS");
    }

    #[test]
    fn filters_combine() {
        let (_dir, conn) = seeded();
        let rows = query(
            &conn,
            &LogQuery {
                user_code: Some("E001".into()),
                action_type: Some("LOGIN_SUCCESS".into()),
                ..LogQuery::default()
            },
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.user_code == "E001"));
    }

    #[test]
    fn date_only_end_covers_the_whole_day() {
        let (_dir, conn) = seeded();
        let rows = query(
            &conn,
            &LogQuery {
                start_date: Some("2026-03-01".into()),
                end_date: Some("2026-03-01".into()),
                ..LogQuery::default()
            },
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.user_code == "E001"));
    }

    #[test]
    fn blank_filters_are_ignored_and_limit_is_clamped() {
        let (_dir, conn) = seeded();
        let rows = query(
            &conn,
            &LogQuery {
                user_code: Some(String::new()),
                limit: Some(0),
                ..LogQuery::default()
            },
        )
        .unwrap();
        assert_eq!(rows.len(), 1);

        let rows = query(
            &conn,
            &LogQuery {
                limit: Some(50_000),
                ..LogQuery::default()
            },
        )
        .unwrap();
        assert_eq!(rows.len(), 4);
    }

    #[test]
    fn explicit_end_time_is_kept() {
        assert_eq!(end_of_day("2026-03-01"), "2026-03-01 23:59:59");
        assert_eq!(end_of_day("2026-03-01 12:00:00"), "2026-03-01 12:00:00");
    }
}
