//! Procedure queries.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::DbResult;
use crate::models::{NewProcedure, Procedure};
use chrono::Utc;

const COLUMNS: &str =
    "pr.id, pr.case_id, pr.appointment_id, pr.data, pr.created_at, pr.updated_at";

fn map_row(row: &Row<'_>) -> rusqlite::Result<Procedure> {
    Ok(Procedure {
        id: row.get(0)?,
        case_id: row.get(1)?,
        appointment_id: row.get(2)?,
        data: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

pub fn insert(conn: &Connection, new: &NewProcedure) -> DbResult<Procedure> {
    let now = Utc::now();
    conn.execute(
        r#"
        INSERT INTO procedures (case_id, appointment_id, data, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?4)
        "#,
        params![new.case_id, new.appointment_id, new.data, now],
    )?;

    Ok(Procedure {
        id: conn.last_insert_rowid(),
        case_id: new.case_id,
        appointment_id: new.appointment_id,
        data: new.data.clone(),
        created_at: now,
        updated_at: now,
    })
}

/// Get a procedure whose case and patient are both active.
pub fn find_visible(conn: &Connection, id: i64) -> DbResult<Option<Procedure>> {
    conn.query_row(
        &format!(
            r#"
            SELECT {COLUMNS} FROM procedures pr
            JOIN cases c ON c.id = pr.case_id
            JOIN patients p ON p.id = c.patient_id
            WHERE pr.id = ?1 AND c.status = 'active' AND p.status = 'active'
            "#
        ),
        [id],
        map_row,
    )
    .optional()
    .map_err(Into::into)
}

pub fn list_for_case(conn: &Connection, case_id: i64) -> DbResult<Vec<Procedure>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM procedures pr WHERE pr.case_id = ?1 ORDER BY pr.id"
    ))?;
    let procedures = stmt
        .query_map([case_id], map_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(procedures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{cases, patients, Database};
    use crate::models::{NewCase, NewPatient};
    use mission_types::NonEmptyText;
    use serde_json::json;

    #[test]
    fn data_round_trips_as_json() {
        let db = Database::open_in_memory().unwrap();
        let patient = patients::insert(
            db.conn(),
            &NewPatient {
                name: NonEmptyText::new("Ana").unwrap(),
                birth: None,
                death: None,
                gender: None,
            },
        )
        .unwrap();
        let case = cases::insert(
            db.conn(),
            &NewCase {
                patient_id: patient.id,
                anatomy: None,
                side: None,
            },
        )
        .unwrap();

        let data = json!({"type": "operation", "providers": {"surgeon": "Dr. Ruiz"}});
        let created = insert(
            db.conn(),
            &NewProcedure {
                case_id: case.id,
                appointment_id: None,
                data: data.clone(),
            },
        )
        .unwrap();

        let found = find_visible(db.conn(), created.id).unwrap().unwrap();
        assert_eq!(found.data, data);
        assert_eq!(list_for_case(db.conn(), case.id).unwrap().len(), 1);

        db.conn()
            .execute("UPDATE cases SET status = 'deleted' WHERE id = ?1", [case.id])
            .unwrap();
        assert!(find_visible(db.conn(), created.id).unwrap().is_none());
    }
}
