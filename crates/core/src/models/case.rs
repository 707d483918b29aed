//! Cases: a diagnosis for one patient and body region.

use super::RecordStatus;
use crate::validation::optional_text;
use api_shared::dto::CaseReq;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub id: i64,
    /// Fixed at creation.
    pub patient_id: i64,
    pub anatomy: Option<String>,
    pub side: Option<String>,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCase {
    pub patient_id: i64,
    pub anatomy: Option<String>,
    pub side: Option<String>,
}

impl NewCase {
    pub fn from_req(patient_id: i64, req: &CaseReq) -> Self {
        Self {
            patient_id,
            anatomy: optional_text(req.anatomy.as_deref()),
            side: optional_text(req.side.as_deref()),
        }
    }
}

/// Partial update. Ownership (`patientId` / `patient`) is not representable here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseChanges {
    pub anatomy: Option<String>,
    pub side: Option<String>,
}

impl CaseChanges {
    pub fn from_req(req: &CaseReq) -> Self {
        Self {
            anatomy: optional_text(req.anatomy.as_deref()),
            side: optional_text(req.side.as_deref()),
        }
    }

    pub fn apply(self, case: &mut Case) {
        if let Some(anatomy) = self.anatomy {
            case.anatomy = Some(anatomy);
        }
        if let Some(side) = self.side {
            case.side = Some(side);
        }
    }
}
