//! `v1` views.

use super::{date, timestamp};
use mission_core::models::{self, AppointmentDetail, CaseDetail, MissionDetail};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub birth: Option<String>,
    pub death: Option<String>,
    pub gender: Option<String>,
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient: Option<Patient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub procedures: Option<Vec<Procedure>>,
}

impl Case {
    pub fn present(detail: &CaseDetail) -> Self {
        Self {
            patient: Some(Patient::present(&detail.patient, None)),
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

    /// The case alone, as nested under its patient.
    pub fn summary(case: &models::Case) -> Self {
        Self {
            id: case.id,
            patient_id: case.patient_id,
            anatomy: case.anatomy.clone(),
            side: case.side.clone(),
            patient: None,
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
    pub patient: Patient,
}

impl Appointment {
    pub fn present(detail: &AppointmentDetail) -> Self {
        let appointment = &detail.appointment;
        Self {
            id: appointment.id,
            patient_id: appointment.patient_id,
            trip_id: appointment.trip_id,
            order: appointment.order,
            location: appointment.location.clone(),
            start: appointment.start.as_ref().map(timestamp),
            end: appointment.end.as_ref().map(timestamp),
            patient: Patient::present(&detail.patient, None),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: i64,
    pub record_id: i64,
    pub record_type: &'static str,
    pub description: Option<String>,
    pub document_file_name: String,
    pub document_content_type: String,
    pub document_file_size: i64,
    pub created_at: String,
}

impl Attachment {
    pub fn present(attachment: &models::Attachment) -> Self {
        Self {
            id: attachment.id,
            record_id: attachment.record.id(),
            record_type: attachment.record.type_name(),
            description: attachment.description.clone(),
            document_file_name: attachment.document_file_name.clone(),
            document_content_type: attachment.document_content_type.clone(),
            document_file_size: attachment.document_file_size,
            created_at: timestamp(&attachment.created_at),
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
}

impl Procedure {
    pub fn present(procedure: &models::Procedure) -> Self {
        Self {
            id: procedure.id,
            case_id: procedure.case_id,
            appointment_id: procedure.appointment_id,
            data: procedure.data.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Team {
    pub id: i64,
    pub name: String,
}

impl Team {
    pub fn present(team: &models::Team) -> Self {
        Self {
            id: team.id,
            name: team.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mission {
    pub id: i64,
    pub name: String,
    pub teams: Vec<Team>,
}

impl Mission {
    pub fn present(detail: &MissionDetail) -> Self {
        Self {
            id: detail.mission.id,
            name: detail.mission.name.clone(),
            teams: detail.teams.iter().map(Team::present).collect(),
        }
    }
}
