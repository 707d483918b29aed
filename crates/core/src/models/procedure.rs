//! Procedures performed on a case, optionally during an appointment.

use crate::error::{ServiceError, ServiceResult};
use api_shared::dto::ProcedureReq;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Procedure {
    pub id: i64,
    pub case_id: i64,
    pub appointment_id: Option<i64>,
    /// Free-form structured details.
    pub data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProcedure {
    pub case_id: i64,
    pub appointment_id: Option<i64>,
    pub data: Value,
}

impl NewProcedure {
    pub fn from_req(req: &ProcedureReq) -> ServiceResult<Self> {
        let case_id = req
            .case_id
            .ok_or_else(|| ServiceError::MissingParameter("Missing case id".into()))?;
        let data = match &req.data {
            None | Some(Value::Null) => Value::Object(Default::default()),
            Some(Value::Object(map)) => Value::Object(map.clone()),
            Some(_) => return Err(ServiceError::Validation("data must be an object".into())),
        };
        Ok(Self {
            case_id,
            appointment_id: req.appointment_id,
            data,
        })
    }
}
