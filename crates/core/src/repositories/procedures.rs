//! Procedure operations.

use crate::db::{appointments, cases, procedures, SharedDatabase};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{NewProcedure, Procedure};
use api_shared::dto::ProcedureReq;

#[derive(Clone, Debug)]
pub struct ProcedureService {
    db: SharedDatabase,
}

impl ProcedureService {
    pub fn new(db: SharedDatabase) -> Self {
        Self { db }
    }

    /// Records a procedure against a visible case and, optionally, a visible appointment.
    pub fn create(&self, req: &ProcedureReq) -> ServiceResult<Procedure> {
        let new = NewProcedure::from_req(req)?;
        let db = self.db.lock()?;

        cases::find_visible(db.conn(), new.case_id)?.ok_or(ServiceError::NotFound)?;
        if let Some(appointment_id) = new.appointment_id {
            appointments::find_visible(db.conn(), appointment_id)?.ok_or(ServiceError::NotFound)?;
        }

        Ok(procedures::insert(db.conn(), &new)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::{patient, shared_db};
    use crate::repositories::{CaseService, PatientService};
    use api_shared::dto::CaseReq;
    use serde_json::json;

    fn case(db: &SharedDatabase, owner: i64) -> i64 {
        CaseService::new(db.clone())
            .create(&CaseReq {
                patient_id: Some(owner),
                ..Default::default()
            })
            .unwrap()
            .case
            .id
    }

    #[test]
    fn stores_data_opaquely() {
        let db = shared_db();
        let owner = patient(&db, "Ana");
        let case_id = case(&db, owner);

        let data = json!({"date": "2015-03-02", "type": "operation", "version": 2});
        let created = ProcedureService::new(db)
            .create(&ProcedureReq {
                case_id: Some(case_id),
                appointment_id: None,
                data: Some(data.clone()),
            })
            .unwrap();
        assert_eq!(created.data, data);
        assert_eq!(created.case_id, case_id);
    }

    #[test]
    fn missing_case_id_is_reported() {
        let err = ProcedureService::new(shared_db())
            .create(&ProcedureReq::default())
            .unwrap_err();
        assert!(matches!(err, ServiceError::MissingParameter(_)));
    }

    #[test]
    fn case_of_deleted_patient_is_not_found() {
        let db = shared_db();
        let owner = patient(&db, "Ana");
        let case_id = case(&db, owner);
        PatientService::new(db.clone()).delete(owner).unwrap();

        let result = ProcedureService::new(db).create(&ProcedureReq {
            case_id: Some(case_id),
            ..Default::default()
        });
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn unknown_appointment_is_not_found() {
        let db = shared_db();
        let owner = patient(&db, "Ana");
        let case_id = case(&db, owner);

        let result = ProcedureService::new(db).create(&ProcedureReq {
            case_id: Some(case_id),
            appointment_id: Some(77),
            data: None,
        });
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }
}
