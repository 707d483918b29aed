//! Patient operations.

use crate::db::{cases, patients, SharedDatabase};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{NewPatient, Patient, PatientChanges, PatientDetail};
use api_shared::dto::PatientReq;

/// Service for listing, searching and maintaining patients.
#[derive(Clone, Debug)]
pub struct PatientService {
    db: SharedDatabase,
}

impl PatientService {
    pub fn new(db: SharedDatabase) -> Self {
        Self { db }
    }

    /// Active patients, each with its active cases when `show_cases` is set.
    pub fn list(&self, show_cases: bool) -> ServiceResult<Vec<PatientDetail>> {
        let db = self.db.lock()?;
        let conn = db.conn();
        patients::list_active(conn)?
            .into_iter()
            .map(|patient| -> ServiceResult<PatientDetail> {
                let cases = if show_cases {
                    Some(cases::list_active_for_patient(conn, patient.id)?)
                } else {
                    None
                };
                Ok(PatientDetail { patient, cases })
            })
            .collect()
    }

    /// Case-insensitive substring match on name. A missing or blank query matches nothing.
    pub fn search(&self, query: Option<&str>) -> ServiceResult<Vec<Patient>> {
        let Some(query) = query else {
            return Ok(Vec::new());
        };
        let db = self.db.lock()?;
        Ok(patients::search_active(db.conn(), query)?)
    }

    pub fn get(&self, id: i64, show_cases: bool) -> ServiceResult<PatientDetail> {
        let db = self.db.lock()?;
        let conn = db.conn();
        let patient = patients::find_active(conn, id)?.ok_or(ServiceError::NotFound)?;
        let cases = if show_cases {
            Some(cases::list_active_for_patient(conn, id)?)
        } else {
            None
        };
        Ok(PatientDetail { patient, cases })
    }

    pub fn create(&self, req: &PatientReq) -> ServiceResult<Patient> {
        let new = NewPatient::from_req(req)?;
        let db = self.db.lock()?;
        let patient = patients::insert(db.conn(), &new)?;
        tracing::debug!(id = patient.id, "patient created");
        Ok(patient)
    }

    /// Applies the fields present in `req`; everything else is left as stored.
    pub fn update(&self, id: i64, req: &PatientReq) -> ServiceResult<Patient> {
        let changes = PatientChanges::from_req(req)?;
        let db = self.db.lock()?;
        let mut patient = patients::find_active(db.conn(), id)?.ok_or(ServiceError::NotFound)?;
        changes.apply(&mut patient);
        Ok(patients::update(db.conn(), &patient)?)
    }

    /// Soft-deletes the patient and all of its cases.
    pub fn delete(&self, id: i64) -> ServiceResult<()> {
        let mut db = self.db.lock()?;
        let patient = patients::find_active(db.conn(), id)?.ok_or(ServiceError::NotFound)?;
        db.soft_delete(&patient)?;
        Ok(())
    }
}
