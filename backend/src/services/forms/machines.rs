//! SQL over `as_machine_master`, the machine-to-template assignments.

use crate::error::ApiError;
use crate::services::forms::catalog::TemplateId;
use chrono::Utc;
use common::model::form::{MachineAssignment, DEFAULT_ASSIGNMENT_DEPARTMENT};
use rusqlite::{params, Connection, OptionalExtension, Row};

fn assignment_from_row(row: &Row<'_>) -> Result<MachineAssignment, rusqlite::Error> {
    Ok(MachineAssignment {
        id: row.get(0)?,
        machine_no: row.get(1)?,
        model: row.get(2)?,
        assigned_form: row.get(3)?,
        department: row.get(4)?,
        created_at: row.get(5)?,
    })
}

pub fn list(conn: &Connection) -> Result<Vec<MachineAssignment>, ApiError> {
    let mut stmt = conn.prepare(
        "SELECT id, machine_no, model, assigned_form, department, created_at FROM as_machine_master ORDER BY id",
    )?;
    let rows = stmt.query_map([], assignment_from_row)?;
    Ok(rows.collect::<Result<_, _>>()?)
}

pub fn find(conn: &Connection, id: i64) -> Result<Option<MachineAssignment>, ApiError> {
    Ok(conn
        .query_row(
            "SELECT id, machine_no, model, assigned_form, department, created_at FROM as_machine_master WHERE id = ?1",
            params![id],
            assignment_from_row,
        )
        .optional()?)
}

/// Binds `machine_no`/`model` to a template. The template id has been
/// validated by the caller, so every stored `assigned_form` is addressable.
pub fn assign(
    conn: &Connection,
    machine_no: &str,
    model: &str,
    template: &TemplateId,
    department: Option<&str>,
) -> Result<MachineAssignment, ApiError> {
    conn.execute(
        "INSERT INTO as_machine_master (machine_no, model, assigned_form, department, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            machine_no,
            model,
            template.as_str(),
            department.unwrap_or(DEFAULT_ASSIGNMENT_DEPARTMENT),
            Utc::now(),
        ],
    )?;
    find(conn, conn.last_insert_rowid())?
        .ok_or_else(|| ApiError::Internal("inserted assignment vanished".into()))
}

/// Removes an assignment, returning it if it existed.
pub fn unassign(conn: &Connection, id: i64) -> Result<Option<MachineAssignment>, ApiError> {
    let existing = find(conn, id)?;
    conn.execute("DELETE FROM as_machine_master WHERE id = ?1", params![id])?;
    Ok(existing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::temp_database;

    #[test]
    fn assign_list_unassign() {
        let (_dir, db) = temp_database();
        let conn = db.connect().unwrap();
        let template = TemplateId::parse("ASSY_PROBLEM").unwrap();

        let first = assign(&conn, "NO.1", "AL400G", &template, None).unwrap();
        assign(&conn, "NO.2", "AL400G", &template, Some("EDM")).unwrap();
        assert_eq!(first.department.as_deref(), Some("ASSEMBLY"));

        let all = list(&conn).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].department.as_deref(), Some("EDM"));

        assert_eq!(unassign(&conn, first.id).unwrap().unwrap().machine_no, "NO.1");
        assert!(unassign(&conn, first.id).unwrap().is_none());
        assert_eq!(list(&conn).unwrap().len(), 1);
    }
}
