//! Domain records and the aggregates services hand to presenters.

mod appointment;
mod attachment;
mod case;
mod patient;
mod procedure;
mod status;
mod team;

pub use appointment::{Appointment, AppointmentChanges, NewAppointment};
pub use attachment::{Attachment, NewAttachment, RecordRef};
pub use case::{Case, CaseChanges, NewCase};
pub use patient::{NewPatient, Patient, PatientChanges};
pub use procedure::{NewProcedure, Procedure};
pub use status::RecordStatus;
pub use team::{Mission, NewMission, NewTeam, Team};

/// A patient plus, when requested, its active cases.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientDetail {
    pub patient: Patient,
    pub cases: Option<Vec<Case>>,
}

/// A case with its owning patient and any requested children.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseDetail {
    pub case: Case,
    pub patient: Patient,
    pub attachments: Option<Vec<Attachment>>,
    pub procedures: Option<Vec<Procedure>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentDetail {
    pub appointment: Appointment,
    pub patient: Patient,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MissionDetail {
    pub mission: Mission,
    pub teams: Vec<Team>,
}
