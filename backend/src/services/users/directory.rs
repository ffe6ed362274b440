//! SQL over `users`, joined with presence from `activity_logs`.

use crate::auth::password;
use crate::db::parse_column;
use crate::error::ApiError;
use chrono::Utc;
use common::model::activity::ActionType;
use common::model::role::Role;
use common::model::user::{UserInfo, UserListing};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Account row including the password hash. Never serialized.
pub struct StoredUser {
    pub info: UserInfo,
    pub password_hash: String,
}

/// Validated fields for a create or update.
#[derive(Debug, Clone)]
pub struct UserFields {
    pub code: String,
    pub username: String,
    pub role: Role,
    pub department: Option<String>,
}

fn info_from_row(row: &Row<'_>) -> Result<UserInfo, rusqlite::Error> {
    Ok(UserInfo {
        id: row.get(0)?,
        code: row.get(1)?,
        username: row.get(2)?,
        role: parse_column(3, row.get(3)?)?,
        department: row.get(4)?,
    })
}

/// Every account, newest first, with its latest login/logout event.
pub fn list(conn: &Connection) -> Result<Vec<UserListing>, ApiError> {
    let presence = format!(
        "FROM activity_logs a WHERE a.user_code = u.code AND a.action_type IN ('{}', '{}') \
         ORDER BY a.id DESC LIMIT 1",
        ActionType::LoginSuccess,
        ActionType::Logout
    );
    let sql = format!(
        "SELECT u.id, u.code, u.username, u.role, u.department, u.create_at, \
         (SELECT a.action_type {presence}), (SELECT a.created_at {presence}) \
         FROM users u ORDER BY u.create_at DESC, u.id DESC",
        presence = presence
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| {
        let last_action: Option<String> = row.get(6)?;
        Ok(UserListing {
            id: row.get(0)?,
            code: row.get(1)?,
            username: row.get(2)?,
            role: parse_column(3, row.get(3)?)?,
            department: row.get(4)?,
            create_at: row.get(5)?,
            online: last_action.as_deref() == Some(ActionType::LoginSuccess.as_str()),
            last_action,
            last_action_at: row.get(7)?,
        })
    })?;
    Ok(rows.collect::<Result<_, _>>()?)
}

pub fn find_by_code(conn: &Connection, code: &str) -> Result<Option<StoredUser>, ApiError> {
    Ok(conn
        .query_row(
            "SELECT id, code, username, role, department, password_hash FROM users WHERE code = ?1",
            params![code],
            |row| {
                Ok(StoredUser {
                    info: info_from_row(row)?,
                    password_hash: row.get(5)?,
                })
            },
        )
        .optional()?)
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<UserInfo>, ApiError> {
    Ok(conn
        .query_row(
            "SELECT id, code, username, role, department FROM users WHERE id = ?1",
            params![id],
            info_from_row,
        )
        .optional()?)
}

pub fn count_admins(conn: &Connection) -> Result<i64, ApiError> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM users WHERE role = ?1",
        params![Role::Admin.as_str()],
        |row| row.get(0),
    )?)
}

/// Creates an account. The password is hashed here; plain text never
/// reaches the database.
pub fn create(
    conn: &Connection,
    fields: &UserFields,
    plain_password: &str,
    bcrypt_cost: u32,
) -> Result<UserInfo, ApiError> {
    if find_by_code(conn, &fields.code)?.is_some() {
        return Err(ApiError::DuplicateCode);
    }
    let hash = password::hash(plain_password, bcrypt_cost)?;
    conn.execute(
        "INSERT INTO users (code, username, password_hash, role, department, create_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            fields.code,
            fields.username,
            hash,
            fields.role.as_str(),
            fields.department,
            Utc::now(),
        ],
    )
    .map_err(ApiError::from_user_write)?;
    Ok(UserInfo {
        id: conn.last_insert_rowid(),
        code: fields.code.clone(),
        username: fields.username.clone(),
        role: fields.role,
        department: fields.department.clone(),
    })
}

/// Rewrites an account. The stored hash is kept unless `new_password` is
/// given. Returns the number of rows touched.
pub fn update(
    conn: &Connection,
    id: i64,
    fields: &UserFields,
    new_password: Option<&str>,
    bcrypt_cost: u32,
) -> Result<usize, ApiError> {
    let changed = match new_password {
        Some(plain) => {
            let hash = password::hash(plain, bcrypt_cost)?;
            conn.execute(
                "UPDATE users SET username = ?1, role = ?2, code = ?3, department = ?4, password_hash = ?5 WHERE id = ?6",
                params![fields.username, fields.role.as_str(), fields.code, fields.department, hash, id],
            )
        }
        None => conn.execute(
            "UPDATE users SET username = ?1, role = ?2, code = ?3, department = ?4 WHERE id = ?5",
            params![fields.username, fields.role.as_str(), fields.code, fields.department, id],
        ),
    }
    .map_err(ApiError::from_user_write)?;
    Ok(changed)
}

/// Deletes `id` on behalf of `actor_id`. Deleting oneself is refused; an
/// unknown id deletes nothing and returns `None`.
pub fn delete(conn: &Connection, actor_id: i64, id: i64) -> Result<Option<UserInfo>, ApiError> {
    if actor_id == id {
        return Err(ApiError::SelfDeletion);
    }
    let existing = find_by_id(conn, id)?;
    conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;
    Ok(existing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{self, Activity};
    use crate::db::testing::temp_database;
    use actix_web::test::TestRequest;

    fn fields(code: &str, role: Role, department: Option<&str>) -> UserFields {
        UserFields {
            code: code.into(),
            username: format!("User {}", code),
            role,
            department: department.map(str::to_string),
        }
    }

    fn presence(conn: &Connection, code: &str, action: ActionType) {
        let req = TestRequest::default().to_http_request();
        audit::insert(conn, &Activity::new(action, &req).code(code)).unwrap();
    }

    fn listing<'a>(users: &'a [UserListing], code: &str) -> &'a UserListing {
        users.iter().find(|u| u.code == code).unwrap()
    }

    #[test]
    fn online_follows_latest_presence_event() {
        let (_dir, db) = temp_database();
        let conn = db.connect().unwrap();
        create(&conn, &fields("E001", Role::Worker, Some("EDM")), "x", 4).unwrap();

        let users = list(&conn).unwrap();
        assert!(!listing(&users, "E001").online);
        assert_eq!(listing(&users, "E001").last_action, None);

        presence(&conn, "E001", ActionType::LoginSuccess);
        presence(&conn, "E001", ActionType::CreateChecksheetData);
        let users = list(&conn).unwrap();
        assert!(listing(&users, "E001").online);
        assert!(listing(&users, "E001").last_action_at.is_some());

        presence(&conn, "E001", ActionType::Logout);
        assert!(!listing(&list(&conn).unwrap(), "E001").online);
    }

    #[test]
    fn duplicate_codes_are_refused() {
        let (_dir, db) = temp_database();
        let conn = db.connect().unwrap();
        create(&conn, &fields("E001", Role::Worker, None), "x", 4).unwrap();
        assert!(matches!(
            create(&conn, &fields("E001", Role::Leader, None), "y", 4),
            Err(ApiError::DuplicateCode)
        ));

        let other = create(&conn, &fields("E002", Role::Worker, None), "x", 4).unwrap();
        assert!(matches!(
            update(&conn, other.id, &fields("E001", Role::Worker, None), None, 4),
            Err(ApiError::DuplicateCode)
        ));
    }

    #[test]
    fn password_is_hashed_and_kept_unless_replaced() {
        let (_dir, db) = temp_database();
        let conn = db.connect().unwrap();
        let user = create(&conn, &fields("E001", Role::Worker, None), "first", 4).unwrap();
        let stored = find_by_code(&conn, "E001").unwrap().unwrap();
        assert_ne!(stored.password_hash, "first");
        assert!(password::verify("first", &stored.password_hash));

        update(&conn, user.id, &fields("E001", Role::Leader, Some("EDM")), None, 4).unwrap();
        let kept = find_by_code(&conn, "E001").unwrap().unwrap();
        assert_eq!(kept.password_hash, stored.password_hash);
        assert_eq!(kept.info.role, Role::Leader);

        update(&conn, user.id, &fields("E001", Role::Leader, Some("EDM")), Some("second"), 4).unwrap();
        let replaced = find_by_code(&conn, "E001").unwrap().unwrap();
        assert!(password::verify("second", &replaced.password_hash));
    }

    #[test]
    fn self_deletion_is_refused() {
        let (_dir, db) = temp_database();
        let conn = db.connect().unwrap();
        let admin = create(&conn, &fields("A001", Role::Admin, None), "x", 4).unwrap();
        assert!(matches!(
            delete(&conn, admin.id, admin.id),
            Err(ApiError::SelfDeletion)
        ));
        assert!(find_by_id(&conn, admin.id).unwrap().is_some());
    }

    #[test]
    fn deleting_unknown_id_is_not_an_error() {
        let (_dir, db) = temp_database();
        let conn = db.connect().unwrap();
        let admin = create(&conn, &fields("A001", Role::Admin, None), "x", 4).unwrap();
        let worker = create(&conn, &fields("E001", Role::Worker, None), "x", 4).unwrap();

        assert_eq!(delete(&conn, admin.id, worker.id).unwrap().unwrap().code, "E001");
        assert!(delete(&conn, admin.id, worker.id).unwrap().is_none());
        assert!(delete(&conn, admin.id, 9999).unwrap().is_none());
    }

    #[test]
    fn admins_are_counted_by_role() {
        let (_dir, db) = temp_database();
        let conn = db.connect().unwrap();
        assert_eq!(count_admins(&conn).unwrap(), 0);
        create(&conn, &fields("M001", Role::Manager, None), "x", 4).unwrap();
        assert_eq!(count_admins(&conn).unwrap(), 0);
        create(&conn, &fields("A001", Role::Admin, None), "x", 4).unwrap();
        assert_eq!(count_admins(&conn).unwrap(), 1);
    }
}
