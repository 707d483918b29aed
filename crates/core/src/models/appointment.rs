//! Appointments: scheduling slots for a patient on a trip.

use crate::error::ServiceResult;
use crate::validation::{optional_text, optional_timestamp};
use api_shared::dto::AppointmentReq;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hard-deleted; has no status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    pub trip_id: Option<i64>,
    pub order: Option<i64>,
    pub location: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub patient_id: i64,
    pub trip_id: Option<i64>,
    pub order: Option<i64>,
    pub location: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl NewAppointment {
    pub fn from_req(patient_id: i64, req: &AppointmentReq) -> ServiceResult<Self> {
        Ok(Self {
            patient_id,
            trip_id: req.trip_id,
            order: req.order,
            location: optional_text(req.location.as_deref()),
            start: optional_timestamp("start", req.start.as_deref())?,
            end: optional_timestamp("end", req.end.as_deref())?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentChanges {
    pub trip_id: Option<i64>,
    pub order: Option<i64>,
    pub location: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl AppointmentChanges {
    pub fn from_req(req: &AppointmentReq) -> ServiceResult<Self> {
        Ok(Self {
            trip_id: req.trip_id,
            order: req.order,
            location: optional_text(req.location.as_deref()),
            start: optional_timestamp("start", req.start.as_deref())?,
            end: optional_timestamp("end", req.end.as_deref())?,
        })
    }

    pub fn apply(self, appointment: &mut Appointment) {
        if self.trip_id.is_some() {
            appointment.trip_id = self.trip_id;
        }
        if self.order.is_some() {
            appointment.order = self.order;
        }
        if self.location.is_some() {
            appointment.location = self.location;
        }
        if self.start.is_some() {
            appointment.start = self.start;
        }
        if self.end.is_some() {
            appointment.end = self.end;
        }
    }
}
