//! Patient queries.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{like_pattern, DbError, DbResult, UNICODE_LOWER};
use crate::models::{NewPatient, Patient, RecordStatus};
use chrono::Utc;

const COLUMNS: &str = "id, name, birth, death, gender, status, created_at, updated_at";

fn map_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        name: row.get(1)?,
        birth: row.get(2)?,
        death: row.get(3)?,
        gender: row.get(4)?,
        status: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

/// Insert a new, active patient.
pub fn insert(conn: &Connection, new: &NewPatient) -> DbResult<Patient> {
    let now = Utc::now();
    conn.execute(
        r#"
        INSERT INTO patients (name, birth, death, gender, status, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
        "#,
        params![
            new.name.as_str(),
            new.birth,
            new.death,
            new.gender,
            RecordStatus::Active,
            now,
        ],
    )?;

    Ok(Patient {
        id: conn.last_insert_rowid(),
        name: new.name.as_str().to_string(),
        birth: new.birth,
        death: new.death,
        gender: new.gender.clone(),
        status: RecordStatus::Active,
        created_at: now,
        updated_at: now,
    })
}

/// Get a patient by id regardless of status.
pub fn find(conn: &Connection, id: i64) -> DbResult<Option<Patient>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM patients WHERE id = ?1"),
        [id],
        map_row,
    )
    .optional()
    .map_err(Into::into)
}

/// Get an active patient by id.
pub fn find_active(conn: &Connection, id: i64) -> DbResult<Option<Patient>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM patients WHERE id = ?1 AND status = 'active'"),
        [id],
        map_row,
    )
    .optional()
    .map_err(Into::into)
}

pub fn list_active(conn: &Connection) -> DbResult<Vec<Patient>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM patients WHERE status = 'active' ORDER BY id"
    ))?;
    let patients = stmt
        .query_map([], map_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(patients)
}

/// Active patients whose name contains `query`, ignoring case.
///
/// A blank query matches nothing.
pub fn search_active(conn: &Connection, query: &str) -> DbResult<Vec<Patient>> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let mut stmt = conn.prepare(&format!(
        r#"
        SELECT {COLUMNS} FROM patients
        WHERE status = 'active' AND {UNICODE_LOWER}(name) LIKE ?1 ESCAPE '\'
        ORDER BY name, id
        "#
    ))?;
    let patients = stmt
        .query_map([like_pattern(query)], map_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(patients)
}

/// Persist edited fields of an active patient. Status is never written here.
pub fn update(conn: &Connection, patient: &Patient) -> DbResult<Patient> {
    let now = Utc::now();
    let rows = conn.execute(
        r#"
        UPDATE patients SET name = ?2, birth = ?3, death = ?4, gender = ?5, updated_at = ?6
        WHERE id = ?1 AND status = 'active'
        "#,
        params![
            patient.id,
            patient.name,
            patient.birth,
            patient.death,
            patient.gender,
            now,
        ],
    )?;
    if rows == 0 {
        return Err(DbError::NotFound(format!("patient {}", patient.id)));
    }
    Ok(Patient {
        updated_at: now,
        ..patient.clone()
    })
}
