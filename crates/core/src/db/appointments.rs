//! Appointment queries.
//!
//! Appointments are hard-deleted and are only visible through an active patient.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{DbError, DbResult};
use crate::models::{Appointment, NewAppointment};
use chrono::Utc;

const COLUMNS: &str = "a.id, a.patient_id, a.trip_id, a.visit_order, a.location, a.start_at, \
                       a.end_at, a.created_at, a.updated_at";

/// Exact-match list filters; `None` means "any".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentFilter {
    pub trip_id: Option<i64>,
    pub location: Option<String>,
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        trip_id: row.get(2)?,
        order: row.get(3)?,
        location: row.get(4)?,
        start: row.get(5)?,
        end: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

pub fn insert(conn: &Connection, new: &NewAppointment) -> DbResult<Appointment> {
    let now = Utc::now();
    conn.execute(
        r#"
        INSERT INTO appointments (
            patient_id, trip_id, visit_order, location, start_at, end_at, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
        "#,
        params![
            new.patient_id,
            new.trip_id,
            new.order,
            new.location,
            new.start,
            new.end,
            now,
        ],
    )?;

    Ok(Appointment {
        id: conn.last_insert_rowid(),
        patient_id: new.patient_id,
        trip_id: new.trip_id,
        order: new.order,
        location: new.location.clone(),
        start: new.start,
        end: new.end,
        created_at: now,
        updated_at: now,
    })
}

/// Get an appointment whose patient is active.
pub fn find_visible(conn: &Connection, id: i64) -> DbResult<Option<Appointment>> {
    conn.query_row(
        &format!(
            r#"
            SELECT {COLUMNS} FROM appointments a
            JOIN patients p ON p.id = a.patient_id
            WHERE a.id = ?1 AND p.status = 'active'
            "#
        ),
        [id],
        map_row,
    )
    .optional()
    .map_err(Into::into)
}

pub fn list_visible(conn: &Connection, filter: &AppointmentFilter) -> DbResult<Vec<Appointment>> {
    let mut stmt = conn.prepare(&format!(
        r#"
        SELECT {COLUMNS} FROM appointments a
        JOIN patients p ON p.id = a.patient_id
        WHERE p.status = 'active'
          AND (?1 IS NULL OR a.trip_id = ?1)
          AND (?2 IS NULL OR a.location = ?2)
        ORDER BY a.id
        "#
    ))?;
    let appointments = stmt
        .query_map(params![filter.trip_id, filter.location], map_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(appointments)
}

/// Persist edited fields. `patient_id` is never written here.
pub fn update(conn: &Connection, appointment: &Appointment) -> DbResult<Appointment> {
    let now = Utc::now();
    let rows = conn.execute(
        r#"
        UPDATE appointments
        SET trip_id = ?2, visit_order = ?3, location = ?4, start_at = ?5, end_at = ?6,
            updated_at = ?7
        WHERE id = ?1
        "#,
        params![
            appointment.id,
            appointment.trip_id,
            appointment.order,
            appointment.location,
            appointment.start,
            appointment.end,
            now,
        ],
    )?;
    if rows == 0 {
        return Err(DbError::NotFound(format!("appointment {}", appointment.id)));
    }
    Ok(Appointment {
        updated_at: now,
        ..appointment.clone()
    })
}

/// Physically removes the row.
pub fn delete(conn: &Connection, id: i64) -> DbResult<()> {
    let rows = conn.execute("DELETE FROM appointments WHERE id = ?1", [id])?;
    if rows == 0 {
        return Err(DbError::NotFound(format!("appointment {id}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{patients, Database};
    use crate::models::NewPatient;
    use mission_types::NonEmptyText;

    fn patient(db: &Database) -> i64 {
        patients::insert(
            db.conn(),
            &NewPatient {
                name: NonEmptyText::new("Ana").unwrap(),
                birth: None,
                death: None,
                gender: None,
            },
        )
        .unwrap()
        .id
    }

    fn appointment(patient_id: i64, trip_id: i64, location: &str) -> NewAppointment {
        NewAppointment {
            patient_id,
            trip_id: Some(trip_id),
            order: Some(1),
            location: Some(location.into()),
            start: None,
            end: None,
        }
    }

    #[test]
    fn filters_are_exact_matches() {
        let db = Database::open_in_memory().unwrap();
        let patient_id = patient(&db);
        insert(db.conn(), &appointment(patient_id, 1, "Clinic A")).unwrap();
        insert(db.conn(), &appointment(patient_id, 2, "Clinic A")).unwrap();
        insert(db.conn(), &appointment(patient_id, 2, "Clinic B")).unwrap();

        let by_trip = AppointmentFilter {
            trip_id: Some(2),
            location: None,
        };
        assert_eq!(list_visible(db.conn(), &by_trip).unwrap().len(), 2);

        let by_both = AppointmentFilter {
            trip_id: Some(2),
            location: Some("Clinic A".into()),
        };
        assert_eq!(list_visible(db.conn(), &by_both).unwrap().len(), 1);

        let partial = AppointmentFilter {
            trip_id: None,
            location: Some("Clinic".into()),
        };
        assert!(list_visible(db.conn(), &partial).unwrap().is_empty());

        assert_eq!(
            list_visible(db.conn(), &AppointmentFilter::default())
                .unwrap()
                .len(),
            3
        );
    }

    #[test]
    fn deleted_patient_hides_appointments() {
        let db = Database::open_in_memory().unwrap();
        let patient_id = patient(&db);
        let created = insert(db.conn(), &appointment(patient_id, 1, "Clinic A")).unwrap();
        db.conn()
            .execute("UPDATE patients SET status = 'deleted' WHERE id = ?1", [patient_id])
            .unwrap();

        assert!(find_visible(db.conn(), created.id).unwrap().is_none());
        assert!(list_visible(db.conn(), &AppointmentFilter::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn delete_removes_row() {
        let db = Database::open_in_memory().unwrap();
        let patient_id = patient(&db);
        let created = insert(db.conn(), &appointment(patient_id, 1, "Clinic A")).unwrap();

        delete(db.conn(), created.id).unwrap();
        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM appointments", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
        assert!(matches!(delete(db.conn(), created.id), Err(DbError::NotFound(_))));
    }
}
