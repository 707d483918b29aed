//! Legacy views: unwrapped, with record timestamps and without nested parents.

use super::{date, timestamp};
use mission_core::models::{self, CaseDetail};
use serde::Serialize;
use serde_json::Value;

pub use super::v1::Attachment;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub birth: Option<String>,
    pub death: Option<String>,
    pub gender: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cases: Option<Vec<Case>>,
}

impl Patient {
    pub fn present(patient: &models::Patient, cases: Option<&[models::Case]>) -> Self {
        Self {
            id: patient.id,
            name: patient.name.clone(),
            birth: date(patient.birth),
            death: date(patient.death),
            gender: patient.gender.clone(),
            created_at: timestamp(&patient.created_at),
            updated_at: timestamp(&patient.updated_at),
            cases: cases.map(|cases| cases.iter().map(Case::summary).collect()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    pub id: i64,
    pub patient_id: i64,
    pub anatomy: Option<String>,
    pub side: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub procedures: Option<Vec<Procedure>>,
}

impl Case {
    pub fn present(detail: &CaseDetail) -> Self {
        Self {
            attachments: detail
                .attachments
                .as_ref()
                .map(|items| items.iter().map(Attachment::present).collect()),
            procedures: detail
                .procedures
                .as_ref()
                .map(|items| items.iter().map(Procedure::present).collect()),
            ..Self::summary(&detail.case)
        }
    }

    pub fn summary(case: &models::Case) -> Self {
        Self {
            id: case.id,
            patient_id: case.patient_id,
            anatomy: case.anatomy.clone(),
            side: case.side.clone(),
            created_at: timestamp(&case.created_at),
            updated_at: timestamp(&case.updated_at),
            attachments: None,
            procedures: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    pub trip_id: Option<i64>,
    pub order: Option<i64>,
    pub location: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Appointment {
    pub fn present(appointment: &models::Appointment) -> Self {
        Self {
            id: appointment.id,
            patient_id: appointment.patient_id,
            trip_id: appointment.trip_id,
            order: appointment.order,
            location: appointment.location.clone(),
            start: appointment.start.as_ref().map(timestamp),
            end: appointment.end.as_ref().map(timestamp),
            created_at: timestamp(&appointment.created_at),
            updated_at: timestamp(&appointment.updated_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Procedure {
    pub id: i64,
    pub case_id: i64,
    pub appointment_id: Option<i64>,
    pub data: Value,
    pub created_at: String,
    pub updated_at: String,
}

impl Procedure {
    pub fn present(procedure: &models::Procedure) -> Self {
        Self {
            id: procedure.id,
            case_id: procedure.case_id,
            appointment_id: procedure.appointment_id,
            data: procedure.data.clone(),
            created_at: timestamp(&procedure.created_at),
            updated_at: timestamp(&procedure.updated_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Team {
    pub fn present(team: &models::Team) -> Self {
        Self {
            id: team.id,
            name: team.name.clone(),
            created_at: timestamp(&team.created_at),
            updated_at: timestamp(&team.updated_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub id: i64,
    pub name: String,
    pub team_ids: Vec<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl Mission {
    pub fn present(mission: &models::Mission) -> Self {
        Self {
            id: mission.id,
            name: mission.name.clone(),
            team_ids: mission.team_ids.clone(),
            created_at: timestamp(&mission.created_at),
            updated_at: timestamp(&mission.updated_at),
        }
    }
}
