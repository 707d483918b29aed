//! Case queries.
//!
//! A case is only visible while both it and its patient are active.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{DbError, DbResult};
use crate::models::{Case, NewCase, RecordStatus};
use chrono::Utc;

const COLUMNS: &str =
    "c.id, c.patient_id, c.anatomy, c.side, c.status, c.created_at, c.updated_at";

fn map_row(row: &Row<'_>) -> rusqlite::Result<Case> {
    Ok(Case {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        anatomy: row.get(2)?,
        side: row.get(3)?,
        status: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

pub fn insert(conn: &Connection, new: &NewCase) -> DbResult<Case> {
    let now = Utc::now();
    conn.execute(
        r#"
        INSERT INTO cases (patient_id, anatomy, side, status, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?5)
        "#,
        params![new.patient_id, new.anatomy, new.side, RecordStatus::Active, now],
    )?;

    Ok(Case {
        id: conn.last_insert_rowid(),
        patient_id: new.patient_id,
        anatomy: new.anatomy.clone(),
        side: new.side.clone(),
        status: RecordStatus::Active,
        created_at: now,
        updated_at: now,
    })
}

/// Get a case whose own status and whose patient's status are both active.
pub fn find_visible(conn: &Connection, id: i64) -> DbResult<Option<Case>> {
    conn.query_row(
        &format!(
            r#"
            SELECT {COLUMNS} FROM cases c
            JOIN patients p ON p.id = c.patient_id
            WHERE c.id = ?1 AND c.status = 'active' AND p.status = 'active'
            "#
        ),
        [id],
        map_row,
    )
    .optional()
    .map_err(Into::into)
}

/// Cases with the requested status whose patient is active.
///
/// Deleted cases are never returned, even when `status` asks for them.
pub fn list(conn: &Connection, status: RecordStatus) -> DbResult<Vec<Case>> {
    let mut stmt = conn.prepare(&format!(
        r#"
        SELECT {COLUMNS} FROM cases c
        JOIN patients p ON p.id = c.patient_id
        WHERE c.status = ?1 AND c.status <> 'deleted' AND p.status = 'active'
        ORDER BY c.id
        "#
    ))?;
    let cases = stmt
        .query_map([status], map_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(cases)
}

/// Active cases owned by `patient_id`.
pub fn list_active_for_patient(conn: &Connection, patient_id: i64) -> DbResult<Vec<Case>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM cases c WHERE c.patient_id = ?1 AND c.status = 'active' ORDER BY c.id"
    ))?;
    let cases = stmt
        .query_map([patient_id], map_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(cases)
}

/// Persist edited fields. Ownership and status are never written here.
pub fn update(conn: &Connection, case: &Case) -> DbResult<Case> {
    let now = Utc::now();
    let rows = conn.execute(
        r#"
        UPDATE cases SET anatomy = ?2, side = ?3, updated_at = ?4
        WHERE id = ?1 AND status = 'active'
        "#,
        params![case.id, case.anatomy, case.side, now],
    )?;
    if rows == 0 {
        return Err(DbError::NotFound(format!("case {}", case.id)));
    }
    Ok(Case {
        updated_at: now,
        ..case.clone()
    })
}
