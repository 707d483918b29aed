//! Versioned presenters.
//!
//! Each resource has one output struct per API version with an explicit field list; nothing
//! outside that list (notably `status`) can reach a client. Nested associations are presented by
//! their own type's presenter.

pub mod legacy;
pub mod v1;

use crate::version::ApiVersion;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use mission_core::models::{
    AppointmentDetail, Attachment, CaseDetail, MissionDetail, PatientDetail, Procedure, Team,
};
use serde::Serialize;

/// One of a resource's per-version views. Serializes as whichever view it holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Presented<L, V> {
    Legacy(L),
    V1(V),
}

pub type PatientView = Presented<legacy::Patient, v1::Patient>;
pub type CaseView = Presented<legacy::Case, v1::Case>;
pub type AppointmentView = Presented<legacy::Appointment, v1::Appointment>;
pub type AttachmentView = Presented<legacy::Attachment, v1::Attachment>;
pub type ProcedureView = Presented<legacy::Procedure, v1::Procedure>;
pub type TeamView = Presented<legacy::Team, v1::Team>;
pub type MissionView = Presented<legacy::Mission, v1::Mission>;

pub fn patient(version: ApiVersion, detail: &PatientDetail) -> PatientView {
    let cases = detail.cases.as_deref();
    match version {
        ApiVersion::Legacy => Presented::Legacy(legacy::Patient::present(&detail.patient, cases)),
        ApiVersion::V1 => Presented::V1(v1::Patient::present(&detail.patient, cases)),
    }
}

pub fn case(version: ApiVersion, detail: &CaseDetail) -> CaseView {
    match version {
        ApiVersion::Legacy => Presented::Legacy(legacy::Case::present(detail)),
        ApiVersion::V1 => Presented::V1(v1::Case::present(detail)),
    }
}

pub fn appointment(version: ApiVersion, detail: &AppointmentDetail) -> AppointmentView {
    match version {
        ApiVersion::Legacy => Presented::Legacy(legacy::Appointment::present(&detail.appointment)),
        ApiVersion::V1 => Presented::V1(v1::Appointment::present(detail)),
    }
}

pub fn attachment(version: ApiVersion, attachment: &Attachment) -> AttachmentView {
    match version {
        ApiVersion::Legacy => Presented::Legacy(legacy::Attachment::present(attachment)),
        ApiVersion::V1 => Presented::V1(v1::Attachment::present(attachment)),
    }
}

pub fn procedure(version: ApiVersion, procedure: &Procedure) -> ProcedureView {
    match version {
        ApiVersion::Legacy => Presented::Legacy(legacy::Procedure::present(procedure)),
        ApiVersion::V1 => Presented::V1(v1::Procedure::present(procedure)),
    }
}

pub fn team(version: ApiVersion, team: &Team) -> TeamView {
    match version {
        ApiVersion::Legacy => Presented::Legacy(legacy::Team::present(team)),
        ApiVersion::V1 => Presented::V1(v1::Team::present(team)),
    }
}

pub fn mission(version: ApiVersion, detail: &MissionDetail) -> MissionView {
    match version {
        ApiVersion::Legacy => Presented::Legacy(legacy::Mission::present(&detail.mission)),
        ApiVersion::V1 => Presented::V1(v1::Mission::present(detail)),
    }
}

/// `YYYY-MM-DD`
pub(crate) fn date(value: Option<NaiveDate>) -> Option<String> {
    value.map(|d| d.format("%Y-%m-%d").to_string())
}

/// RFC 3339 in UTC with milliseconds: `2014-07-12T00:00:00.000Z`.
pub(crate) fn timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}
