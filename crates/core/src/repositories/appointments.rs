//! Appointment operations.

use crate::db::appointments::{self, AppointmentFilter};
use crate::db::{patients, SharedDatabase};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{Appointment, AppointmentChanges, AppointmentDetail, NewAppointment};
use api_shared::dto::AppointmentReq;
use rusqlite::Connection;

#[derive(Clone, Debug)]
pub struct AppointmentService {
    db: SharedDatabase,
}

impl AppointmentService {
    pub fn new(db: SharedDatabase) -> Self {
        Self { db }
    }

    pub fn list(&self, filter: &AppointmentFilter) -> ServiceResult<Vec<AppointmentDetail>> {
        let db = self.db.lock()?;
        let conn = db.conn();
        appointments::list_visible(conn, filter)?
            .into_iter()
            .map(|appointment| detail(conn, appointment))
            .collect()
    }

    pub fn get(&self, id: i64) -> ServiceResult<AppointmentDetail> {
        let db = self.db.lock()?;
        let appointment =
            appointments::find_visible(db.conn(), id)?.ok_or(ServiceError::NotFound)?;
        detail(db.conn(), appointment)
    }

    /// Requires `patientId` naming an active patient. A nested `patient` is ignored.
    pub fn create(&self, req: &AppointmentReq) -> ServiceResult<AppointmentDetail> {
        let patient_id = req
            .patient_id
            .ok_or_else(|| ServiceError::MissingParameter("Missing patient id".into()))?;
        let new = NewAppointment::from_req(patient_id, req)?;

        let db = self.db.lock()?;
        let patient = patients::find_active(db.conn(), patient_id)?.ok_or(ServiceError::NotFound)?;
        let appointment = appointments::insert(db.conn(), &new)?;
        Ok(AppointmentDetail {
            appointment,
            patient,
        })
    }

    /// Partial update. A `patientId` that differs from the stored one is rejected.
    pub fn update(&self, id: i64, req: &AppointmentReq) -> ServiceResult<AppointmentDetail> {
        let db = self.db.lock()?;
        let mut appointment =
            appointments::find_visible(db.conn(), id)?.ok_or(ServiceError::NotFound)?;

        if req.patient_id.is_some_and(|requested| requested != appointment.patient_id) {
            return Err(ServiceError::MismatchedPatient);
        }

        AppointmentChanges::from_req(req)?.apply(&mut appointment);
        let appointment = appointments::update(db.conn(), &appointment)?;
        detail(db.conn(), appointment)
    }

    /// Removes the appointment permanently.
    pub fn delete(&self, id: i64) -> ServiceResult<()> {
        let db = self.db.lock()?;
        appointments::find_visible(db.conn(), id)?.ok_or(ServiceError::NotFound)?;
        appointments::delete(db.conn(), id)?;
        Ok(())
    }
}

fn detail(conn: &Connection, appointment: Appointment) -> ServiceResult<AppointmentDetail> {
    let patient = patients::find(conn, appointment.patient_id)?.ok_or(ServiceError::NotFound)?;
    Ok(AppointmentDetail {
        appointment,
        patient,
    })
}
