//! Soft-delete policy for patients and cases.
//!
//! A soft-deleted record keeps its row with `status = 'deleted'` and disappears from every
//! client-facing query. Deleting a patient deletes each of its active cases through the case's
//! own [`Deletable::soft_delete`], so every cascaded record gets its own audit line.
//!
//! All of it runs on one [`Transaction`]; see [`crate::db::Database::soft_delete`]. Audit lines
//! are only written for deletions that were committed.

use crate::constants::AUDIT_TARGET;
use crate::db::{cases, DbError, DbResult};
use crate::models::{Case, Patient, RecordStatus};
use chrono::Utc;
use rusqlite::{params, Transaction};

/// One record marked deleted inside a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deletion {
    pub id: i64,
    pub object: &'static str,
}

impl Deletion {
    /// Writes the audit line. Call only once the deletion is committed.
    pub fn audit(&self) {
        tracing::info!(
            target: AUDIT_TARGET,
            "id={} object={} action=delete",
            self.id,
            self.object
        );
    }
}

/// A record type that is soft-deleted rather than removed.
pub trait Deletable {
    /// Type name used in audit lines.
    const TYPE_NAME: &'static str;
    /// Backing table; must have `id`, `status` and `updated_at` columns.
    const TABLE: &'static str;

    fn id(&self) -> i64;

    fn status(&self) -> RecordStatus;

    fn is_active(&self) -> bool {
        self.status() == RecordStatus::Active
    }

    /// Deletes the records owned by this one, appending each to `deleted`.
    fn cascade(&self, _tx: &Transaction<'_>, _deleted: &mut Vec<Deletion>) -> DbResult<()> {
        Ok(())
    }

    /// Marks the record deleted, then runs [`Deletable::cascade`], returning every record it
    /// touched with this one first.
    ///
    /// Fails with [`DbError::NotFound`] if the stored row is not active. The caller owns the
    /// transaction; nothing here commits or writes audit lines.
    fn soft_delete(&self, tx: &Transaction<'_>) -> DbResult<Vec<Deletion>> {
        let rows = tx.execute(
            &format!(
                "UPDATE {} SET status = ?2, updated_at = ?3 WHERE id = ?1 AND status = 'active'",
                Self::TABLE
            ),
            params![self.id(), RecordStatus::Deleted, Utc::now()],
        )?;
        if rows == 0 {
            return Err(DbError::NotFound(format!(
                "{} {}",
                Self::TYPE_NAME,
                self.id()
            )));
        }

        let mut deleted = vec![Deletion {
            id: self.id(),
            object: Self::TYPE_NAME,
        }];
        self.cascade(tx, &mut deleted)?;
        Ok(deleted)
    }
}

impl Deletable for Patient {
    const TYPE_NAME: &'static str = "Patient";
    const TABLE: &'static str = "patients";

    fn id(&self) -> i64 {
        self.id
    }

    fn status(&self) -> RecordStatus {
        self.status
    }

    fn cascade(&self, tx: &Transaction<'_>, deleted: &mut Vec<Deletion>) -> DbResult<()> {
        for case in cases::list_active_for_patient(tx, self.id)? {
            deleted.extend(case.soft_delete(tx)?);
        }
        Ok(())
    }
}

impl Deletable for Case {
    const TYPE_NAME: &'static str = "Case";
    const TABLE: &'static str = "cases";

    fn id(&self) -> i64 {
        self.id
    }

    fn status(&self) -> RecordStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{patients, Database};
    use crate::models::{NewCase, NewPatient};
    use mission_types::NonEmptyText;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    /// Collects formatted log output for assertions.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    impl LogBuffer {
        fn audit_lines(&self) -> Vec<String> {
            String::from_utf8(self.0.lock().unwrap().clone())
                .unwrap()
                .lines()
                .filter(|line| line.contains("action=delete"))
                .map(str::to_string)
                .collect()
        }
    }

    fn logged<T>(f: impl FnOnce() -> T) -> (T, LogBuffer) {
        let buffer = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_ansi(false)
            .without_time()
            .finish();
        let result = tracing::subscriber::with_default(subscriber, f);
        (result, buffer)
    }

    fn refuse_case_deletes(db: &Database) {
        db.conn()
            .execute_batch(
                r#"
                CREATE TRIGGER refuse_case_delete BEFORE UPDATE OF status ON cases
                WHEN NEW.status = 'deleted' AND NEW.id > 1
                BEGIN
                    SELECT RAISE(ABORT, 'case is locked');
                END;
                "#,
            )
            .unwrap();
    }

    fn seed(db: &Database, cases: usize) -> Patient {
        let patient = patients::insert(
            db.conn(),
            &NewPatient {
                name: NonEmptyText::new("Juan Marco").unwrap(),
                birth: None,
                death: None,
                gender: None,
            },
        )
        .unwrap();
        for _ in 0..cases {
            cases::insert(
                db.conn(),
                &NewCase {
                    patient_id: patient.id,
                    anatomy: Some("knee".into()),
                    side: None,
                },
            )
            .unwrap();
        }
        patient
    }

    fn statuses(db: &Database, table: &str) -> Vec<String> {
        db.conn()
            .prepare(&format!("SELECT status FROM {table} ORDER BY id"))
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn deleting_patient_cascades_to_every_case() {
        let mut db = Database::open_in_memory().unwrap();
        let patient = seed(&db, 3);

        db.soft_delete(&patient).unwrap();

        assert_eq!(statuses(&db, "patients"), vec!["deleted"]);
        assert_eq!(statuses(&db, "cases"), vec!["deleted"; 3]);
    }

    #[test]
    fn deleting_case_leaves_patient_active() {
        let mut db = Database::open_in_memory().unwrap();
        let patient = seed(&db, 2);
        let case = cases::list_active_for_patient(db.conn(), patient.id)
            .unwrap()
            .remove(0);

        db.soft_delete(&case).unwrap();

        assert_eq!(statuses(&db, "patients"), vec!["active"]);
        assert_eq!(statuses(&db, "cases"), vec!["deleted", "active"]);
    }

    #[test]
    fn failed_cascade_rolls_back_patient() {
        let mut db = Database::open_in_memory().unwrap();
        let patient = seed(&db, 2);
        refuse_case_deletes(&db);

        let (result, log) = logged(|| db.soft_delete(&patient));

        assert!(matches!(result, Err(DbError::Sqlite(_))));
        assert_eq!(statuses(&db, "patients"), vec!["active"]);
        assert_eq!(statuses(&db, "cases"), vec!["active", "active"]);
        assert!(log.audit_lines().is_empty(), "{:?}", log.audit_lines());
    }

    #[test]
    fn committed_cascade_audits_every_record() {
        let mut db = Database::open_in_memory().unwrap();
        let patient = seed(&db, 2);

        let (result, log) = logged(|| db.soft_delete(&patient));

        let deleted = result.unwrap();
        assert_eq!(
            deleted,
            vec![
                Deletion { id: patient.id, object: "Patient" },
                Deletion { id: 1, object: "Case" },
                Deletion { id: 2, object: "Case" },
            ]
        );
        let lines = log.audit_lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains(&format!("id={} object=Patient action=delete", patient.id)));
        assert!(lines[1].contains("id=1 object=Case action=delete"));
        assert!(lines[2].contains("id=2 object=Case action=delete"));
        assert!(lines.iter().all(|line| line.contains("audit")));
    }

    #[test]
    fn deleting_twice_is_not_found() {
        let mut db = Database::open_in_memory().unwrap();
        let patient = seed(&db, 0);

        db.soft_delete(&patient).unwrap();
        assert!(matches!(db.soft_delete(&patient), Err(DbError::NotFound(_))));
    }

    #[test]
    fn is_active_follows_status() {
        let db = Database::open_in_memory().unwrap();
        let mut patient = seed(&db, 0);
        assert!(patient.is_active());
        patient.status = RecordStatus::Deleted;
        assert!(!patient.is_active());
    }
}
