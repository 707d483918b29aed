//! Patient records.

use super::RecordStatus;
use crate::error::ServiceResult;
use crate::validation::{optional_date, optional_text, present_text, required_text};
use api_shared::dto::PatientReq;
use chrono::{DateTime, NaiveDate, Utc};
use mission_types::NonEmptyText;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub birth: Option<NaiveDate>,
    pub death: Option<NaiveDate>,
    pub gender: Option<String>,
    /// Never settable from client input.
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for a new patient.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPatient {
    pub name: NonEmptyText,
    pub birth: Option<NaiveDate>,
    pub death: Option<NaiveDate>,
    pub gender: Option<String>,
}

impl NewPatient {
    pub fn from_req(req: &PatientReq) -> ServiceResult<Self> {
        Ok(Self {
            name: required_text("name", req.name.as_deref())?,
            birth: optional_date("birth", req.birth.as_deref())?,
            death: optional_date("death", req.death.as_deref())?,
            gender: optional_text(req.gender.as_deref()),
        })
    }
}

/// Partial update; `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientChanges {
    pub name: Option<NonEmptyText>,
    pub birth: Option<NaiveDate>,
    pub death: Option<NaiveDate>,
    pub gender: Option<String>,
}

impl PatientChanges {
    pub fn from_req(req: &PatientReq) -> ServiceResult<Self> {
        Ok(Self {
            name: present_text("name", req.name.as_deref())?,
            birth: optional_date("birth", req.birth.as_deref())?,
            death: optional_date("death", req.death.as_deref())?,
            gender: optional_text(req.gender.as_deref()),
        })
    }

    pub fn apply(self, patient: &mut Patient) {
        if let Some(name) = self.name {
            patient.name = name.into_inner();
        }
        if let Some(birth) = self.birth {
            patient.birth = Some(birth);
        }
        if let Some(death) = self.death {
            patient.death = Some(death);
        }
        if let Some(gender) = self.gender {
            patient.gender = Some(gender);
        }
    }
}
