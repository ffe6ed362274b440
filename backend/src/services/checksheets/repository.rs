//! SQL over `as_checksheet_db`.
//!
//! Every function takes an already-scoped department: callers resolve it with
//! `auth::policy::scope_department` first. A `None` scope means unfiltered.

use crate::error::ApiError;
use chrono::Utc;
use common::model::checksheet::{has_data, Checksheet, ChecksheetOptions, ChecksheetSummary};
use common::requests::{non_empty, ChecksheetFilters, MachineSlotQuery};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use serde_json::Value;

const RECORD_COLUMNS: &str = "id, department, model, machine_no, as_group, checksheet_name, \
     checksheet_data, hash, status, created_at, updated_at";

/// Slot and payload fields written by the form save path.
#[derive(Debug, Clone)]
pub struct FormFields {
    pub department: String,
    pub model: String,
    pub machine_no: String,
    pub as_group: String,
    pub checksheet_name: Option<String>,
    pub checksheet_data: Option<Value>,
    pub status: Option<String>,
}

/// Incrementally built `WHERE` clause with positional parameters.
#[derive(Default)]
struct Conditions {
    sql: String,
    params: Vec<String>,
}

impl Conditions {
    /// `column` is always a literal from this module, never caller input.
    fn eq(mut self, column: &'static str, value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.params.push(value.to_string());
            self.sql
                .push_str(&format!(" AND {} = ?{}", column, self.params.len()));
        }
        self
    }
}

fn record_from_row(row: &Row<'_>) -> Result<Checksheet, rusqlite::Error> {
    Ok(Checksheet {
        id: row.get(0)?,
        department: row.get(1)?,
        model: row.get(2)?,
        machine_no: row.get(3)?,
        as_group: row.get(4)?,
        checksheet_name: row.get(5)?,
        checksheet_data: row.get::<_, Option<Value>>(6)?.filter(|v| !v.is_null()),
        hash: row.get(7)?,
        status: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

/// Stored representation of a payload; JSON `null` is stored as SQL NULL.
fn payload_text(payload: Option<&Value>) -> Option<String> {
    payload.filter(|v| !v.is_null()).map(Value::to_string)
}

/// Hex MD5 of the compact JSON form of the payload, for change detection only.
/// Object keys serialize sorted, so key order on the wire does not matter.
pub fn content_hash(payload: Option<&Value>) -> String {
    let text = payload.unwrap_or(&Value::Null).to_string();
    format!("{:x}", md5::compute(text.as_bytes()))
}

pub fn create(
    conn: &Connection,
    department: &str,
    model: &str,
    as_group: &str,
    machine_no: &str,
    checksheet_name: Option<&str>,
) -> Result<Checksheet, ApiError> {
    let now = Utc::now();
    conn.execute(
        "INSERT INTO as_checksheet_db (department, model, as_group, machine_no, checksheet_name, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        params![department, model, as_group, machine_no, checksheet_name, now],
    )?;
    load_by_id(conn, conn.last_insert_rowid(), None)?
        .ok_or_else(|| ApiError::Internal("inserted checksheet vanished".into()))
}

pub fn list_all(conn: &Connection) -> Result<Vec<Checksheet>, ApiError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM as_checksheet_db ORDER BY id",
        RECORD_COLUMNS
    ))?;
    let rows = stmt.query_map([], record_from_row)?;
    Ok(rows.collect::<Result<_, _>>()?)
}

/// Filtered search, newest first. `scope` replaces any department filter.
pub fn search(
    conn: &Connection,
    filters: &ChecksheetFilters,
    scope: Option<&str>,
) -> Result<Vec<ChecksheetSummary>, ApiError> {
    let conditions = Conditions::default()
        .eq("department", scope)
        .eq("model", non_empty(&filters.model))
        .eq("machine_no", non_empty(&filters.machine_no))
        .eq("as_group", non_empty(&filters.as_group))
        .eq("checksheet_name", non_empty(&filters.checksheet_name));

    let sql = format!(
        "SELECT id, department, model, machine_no, as_group, checksheet_name, status, checksheet_data \
         FROM as_checksheet_db WHERE 1=1{} ORDER BY id DESC",
        conditions.sql
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(conditions.params.iter()), |row| {
        let payload: Option<Value> = row.get(7)?;
        Ok(ChecksheetSummary {
            id: row.get(0)?,
            department: row.get(1)?,
            model: row.get(2)?,
            machine_no: row.get(3)?,
            as_group: row.get(4)?,
            checksheet_name: row.get(5)?,
            status: row.get(6)?,
            has_data: has_data(payload.as_ref()),
        })
    })?;
    Ok(rows.collect::<Result<_, _>>()?)
}

fn distinct(
    conn: &Connection,
    column: &'static str,
    conditions: Conditions,
) -> Result<Vec<String>, ApiError> {
    let sql = format!(
        "SELECT DISTINCT {col} FROM as_checksheet_db WHERE {col} IS NOT NULL{cond} ORDER BY {col}",
        col = column,
        cond = conditions.sql
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(conditions.params.iter()), |row| row.get(0))?;
    Ok(rows.collect::<Result<_, _>>()?)
}

/// Cascading dropdown values. Departments follow only `visible`, the
/// departments the caller may see at all; models follow the chosen
/// `department`; machines and groups follow department and model.
pub fn list_options(
    conn: &Connection,
    visible: Option<&str>,
    department: Option<&str>,
    model: Option<&str>,
) -> Result<ChecksheetOptions, ApiError> {
    Ok(ChecksheetOptions {
        departments: distinct(conn, "department", Conditions::default().eq("department", visible))?,
        models: distinct(conn, "model", Conditions::default().eq("department", department))?,
        machines: distinct(
            conn,
            "machine_no",
            Conditions::default().eq("department", department).eq("model", model),
        )?,
        as_groups: distinct(
            conn,
            "as_group",
            Conditions::default().eq("department", department).eq("model", model),
        )?,
    })
}

/// Sets name and payload. Returns the number of rows touched.
pub fn update(
    conn: &Connection,
    id: i64,
    checksheet_name: Option<&str>,
    payload: Option<&Value>,
) -> Result<usize, ApiError> {
    Ok(conn.execute(
        "UPDATE as_checksheet_db SET checksheet_name = ?1, checksheet_data = ?2, updated_at = ?3 WHERE id = ?4",
        params![checksheet_name, payload_text(payload), Utc::now(), id],
    )?)
}

/// Save path used by the forms. Updates `id` when given (within `scope`),
/// inserts otherwise; the content hash is recomputed either way. Returns
/// `None` when `id` names no record visible in `scope`.
pub fn upsert_form_save(
    conn: &Connection,
    id: Option<i64>,
    fields: &FormFields,
    scope: Option<&str>,
) -> Result<Option<Checksheet>, ApiError> {
    let hash = content_hash(fields.checksheet_data.as_ref());
    let data = payload_text(fields.checksheet_data.as_ref());
    let now = Utc::now();

    let id = match id {
        Some(id) => {
            let changed = conn.execute(
                "UPDATE as_checksheet_db SET department = ?1, model = ?2, machine_no = ?3, as_group = ?4, \
                 checksheet_name = ?5, checksheet_data = ?6, hash = ?7, status = COALESCE(?8, status), updated_at = ?9 \
                 WHERE id = ?10 AND (?11 IS NULL OR department = ?11)",
                params![
                    fields.department,
                    fields.model,
                    fields.machine_no,
                    fields.as_group,
                    fields.checksheet_name,
                    data,
                    hash,
                    fields.status,
                    now,
                    id,
                    scope,
                ],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            id
        }
        None => {
            conn.execute(
                "INSERT INTO as_checksheet_db (department, model, machine_no, as_group, checksheet_name, \
                 checksheet_data, hash, status, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, COALESCE(?8, 'prepare'), ?9, ?9)",
                params![
                    fields.department,
                    fields.model,
                    fields.machine_no,
                    fields.as_group,
                    fields.checksheet_name,
                    data,
                    hash,
                    fields.status,
                    now,
                ],
            )?;
            conn.last_insert_rowid()
        }
    };
    load_by_id(conn, id, None)
}

pub fn load_by_id(
    conn: &Connection,
    id: i64,
    scope: Option<&str>,
) -> Result<Option<Checksheet>, ApiError> {
    Ok(conn
        .query_row(
            &format!(
                "SELECT {} FROM as_checksheet_db WHERE id = ?1 AND (?2 IS NULL OR department = ?2)",
                RECORD_COLUMNS
            ),
            params![id, scope],
            record_from_row,
        )
        .optional()?)
}

/// Most recent record filling the slot, or `None`. `slot.department` is
/// expected to be scoped already.
pub fn load_by_machine_slot(
    conn: &Connection,
    slot: &MachineSlotQuery,
) -> Result<Option<Checksheet>, ApiError> {
    Ok(conn
        .query_row(
            &format!(
                "SELECT {} FROM as_checksheet_db WHERE department = ?1 AND model = ?2 AND machine_no = ?3 \
                 AND as_group = ?4 AND checksheet_name = ?5 ORDER BY id DESC LIMIT 1",
                RECORD_COLUMNS
            ),
            params![
                slot.department,
                slot.model,
                slot.machine_no,
                slot.as_group,
                slot.checksheet_name
            ],
            record_from_row,
        )
        .optional()?)
}

/// Deletes by id. Returns the row as it was, or `None` if nothing matched.
pub fn delete(conn: &Connection, id: i64) -> Result<Option<Checksheet>, ApiError> {
    let existing = load_by_id(conn, id, None)?;
    conn.execute("DELETE FROM as_checksheet_db WHERE id = ?1", params![id])?;
    Ok(existing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::temp_database;
    use serde_json::json;

    fn seed(conn: &Connection) {
        create(conn, "EDM", "AL40G", "SEMI", "NO.1", Some("TEST")).unwrap();
        create(conn, "EDM", "AL40G", "FINAL", "NO.2", Some("TEST")).unwrap();
        create(conn, "EDM", "BX20", "SEMI", "NO.3", Some("DAILY")).unwrap();
        create(conn, "PRESS", "P100", "MAIN", "NO.9", Some("DAILY")).unwrap();
    }

    fn filters(model: Option<&str>) -> ChecksheetFilters {
        ChecksheetFilters {
            model: model.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn created_record_has_defaults() {
        let (_dir, db) = temp_database();
        let conn = db.connect().unwrap();
        let record = create(&conn, "EDM", "AL40G", "SEMI", "NO.1", Some("TEST")).unwrap();
        assert_eq!(record.status, "prepare");
        assert_eq!(record.checksheet_data, None);
        assert!(!record.has_data());
    }

    #[test]
    fn search_is_newest_first_and_anded() {
        let (_dir, db) = temp_database();
        let conn = db.connect().unwrap();
        seed(&conn);

        let all = search(&conn, &ChecksheetFilters::default(), None).unwrap();
        let ids: Vec<i64> = all.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![4, 3, 2, 1]);

        let narrowed = search(
            &conn,
            &ChecksheetFilters {
                model: Some("AL40G".into()),
                as_group: Some("SEMI".into()),
                ..Default::default()
            },
            None,
        )
        .unwrap();
        assert_eq!(narrowed.len(), 1);
        assert_eq!(narrowed[0].machine_no, "NO.1");
    }

    #[test]
    fn search_scope_overrides_department_filter() {
        let (_dir, db) = temp_database();
        let conn = db.connect().unwrap();
        seed(&conn);

        let requested = ChecksheetFilters {
            department: Some("PRESS".into()),
            ..Default::default()
        };
        let rows = search(&conn, &requested, Some("EDM")).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.department == "EDM"));
    }

    #[test]
    fn empty_string_filters_are_ignored() {
        let (_dir, db) = temp_database();
        let conn = db.connect().unwrap();
        seed(&conn);
        let rows = search(&conn, &filters(Some("")), None).unwrap();
        assert_eq!(rows.len(), 4);
    }

    #[test]
    fn has_data_tracks_payload() {
        let (_dir, db) = temp_database();
        let conn = db.connect().unwrap();
        let record = create(&conn, "EDM", "AL40G", "SEMI", "NO.1", Some("TEST")).unwrap();

        let found = search(&conn, &filters(Some("AL40G")), None).unwrap();
        assert!(!found[0].has_data);

        update(&conn, record.id, Some("TEST"), Some(&json!({}))).unwrap();
        assert!(!search(&conn, &filters(Some("AL40G")), None).unwrap()[0].has_data);

        update(&conn, record.id, Some("TEST"), Some(&json!({"pressure": 4.5}))).unwrap();
        assert!(search(&conn, &filters(Some("AL40G")), None).unwrap()[0].has_data);
    }

    #[test]
    fn options_cascade() {
        let (_dir, db) = temp_database();
        let conn = db.connect().unwrap();
        seed(&conn);

        let everything = list_options(&conn, None, None, None).unwrap();
        assert_eq!(everything.departments, vec!["EDM", "PRESS"]);
        assert_eq!(everything.models, vec!["AL40G", "BX20", "P100"]);

        // Choosing a department keeps every department selectable.
        let edm = list_options(&conn, None, Some("EDM"), Some("AL40G")).unwrap();
        assert_eq!(edm.departments, vec!["EDM", "PRESS"]);
        // Models follow the department only, never the chosen model.
        assert_eq!(edm.models, vec!["AL40G", "BX20"]);
        assert_eq!(edm.machines, vec!["NO.1", "NO.2"]);
        assert_eq!(edm.as_groups, vec!["FINAL", "SEMI"]);
    }

    #[test]
    fn options_visible_scope_limits_departments() {
        let (_dir, db) = temp_database();
        let conn = db.connect().unwrap();
        seed(&conn);

        let staff = list_options(&conn, Some("EDM"), Some("EDM"), None).unwrap();
        assert_eq!(staff.departments, vec!["EDM"]);
        assert!(!staff.models.contains(&"P100".to_string()));
        assert!(!staff.machines.contains(&"NO.9".to_string()));
    }

    #[test]
    fn upsert_inserts_then_updates_with_fresh_hash() {
        let (_dir, db) = temp_database();
        let conn = db.connect().unwrap();
        let mut fields = FormFields {
            department: "EDM".into(),
            model: "AL40G".into(),
            machine_no: "NO.1".into(),
            as_group: "SEMI".into(),
            checksheet_name: Some("TEST".into()),
            checksheet_data: Some(json!({"b": 2, "a": 1})),
            status: None,
        };
        let inserted = upsert_form_save(&conn, None, &fields, None).unwrap().unwrap();
        assert_eq!(inserted.status, "prepare");
        assert_eq!(inserted.hash.as_deref(), Some(content_hash(fields.checksheet_data.as_ref()).as_str()));
        assert_eq!(inserted.checksheet_data, Some(json!({"a": 1, "b": 2})));

        fields.checksheet_data = Some(json!({"a": 1, "b": 3}));
        fields.status = Some("done".into());
        let updated = upsert_form_save(&conn, Some(inserted.id), &fields, None)
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, inserted.id);
        assert_eq!(updated.status, "done");
        assert_ne!(updated.hash, inserted.hash);
    }

    #[test]
    fn upsert_outside_scope_touches_nothing() {
        let (_dir, db) = temp_database();
        let conn = db.connect().unwrap();
        let record = create(&conn, "PRESS", "P100", "MAIN", "NO.9", Some("DAILY")).unwrap();
        let fields = FormFields {
            department: "EDM".into(),
            model: "P100".into(),
            machine_no: "NO.9".into(),
            as_group: "MAIN".into(),
            checksheet_name: Some("DAILY".into()),
            checksheet_data: Some(json!({"x": 1})),
            status: None,
        };
        assert!(upsert_form_save(&conn, Some(record.id), &fields, Some("EDM"))
            .unwrap()
            .is_none());
        assert_eq!(load_by_id(&conn, record.id, None).unwrap().unwrap().department, "PRESS");
    }

    #[test]
    fn hash_ignores_key_order() {
        let a: Value = serde_json::from_str(r#"{"x":1,"y":[1,2]}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"y":[1,2],"x":1}"#).unwrap();
        assert_eq!(content_hash(Some(&a)), content_hash(Some(&b)));
        assert_eq!(content_hash(None), format!("{:x}", md5::compute(b"null")));
    }

    #[test]
    fn slot_lookup_returns_latest_or_none() {
        let (_dir, db) = temp_database();
        let conn = db.connect().unwrap();
        seed(&conn);
        let newer = create(&conn, "EDM", "AL40G", "SEMI", "NO.1", Some("TEST")).unwrap();

        let slot = MachineSlotQuery {
            department: "EDM".into(),
            model: "AL40G".into(),
            machine_no: "NO.1".into(),
            as_group: "SEMI".into(),
            checksheet_name: "TEST".into(),
        };
        assert_eq!(load_by_machine_slot(&conn, &slot).unwrap().unwrap().id, newer.id);

        let missing = MachineSlotQuery {
            machine_no: "NO.404".into(),
            ..slot
        };
        assert!(load_by_machine_slot(&conn, &missing).unwrap().is_none());
    }

    #[test]
    fn load_by_id_respects_scope() {
        let (_dir, db) = temp_database();
        let conn = db.connect().unwrap();
        seed(&conn);
        assert!(load_by_id(&conn, 4, Some("PRESS")).unwrap().is_some());
        assert!(load_by_id(&conn, 4, Some("EDM")).unwrap().is_none());
    }

    #[test]
    fn delete_reports_what_it_removed() {
        let (_dir, db) = temp_database();
        let conn = db.connect().unwrap();
        seed(&conn);
        assert_eq!(delete(&conn, 1).unwrap().unwrap().machine_no, "NO.1");
        assert!(delete(&conn, 1).unwrap().is_none());
        assert_eq!(list_all(&conn).unwrap().len(), 3);
    }
}
