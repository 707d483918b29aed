//! Case operations.
//!
//! A case's owner is fixed at creation: updates never touch `patient_id`.

use crate::db::{attachments, cases, patients, procedures, SharedDatabase};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{Case, CaseChanges, CaseDetail, NewCase, NewPatient, RecordRef, RecordStatus};
use api_shared::dto::CaseReq;
use rusqlite::Connection;

/// Which nested associations to load alongside a case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaseIncludes {
    pub attachments: bool,
    pub procedures: bool,
}

#[derive(Clone, Debug)]
pub struct CaseService {
    db: SharedDatabase,
}

impl CaseService {
    pub fn new(db: SharedDatabase) -> Self {
        Self { db }
    }

    /// Cases in `status` (default active) whose patient is active.
    ///
    /// An unrecognised or `deleted` status yields an empty list.
    pub fn list(
        &self,
        status: Option<&str>,
        includes: CaseIncludes,
    ) -> ServiceResult<Vec<CaseDetail>> {
        let status = match status.map(str::trim).filter(|s| !s.is_empty()) {
            None => RecordStatus::Active,
            Some(raw) => match RecordStatus::parse(raw) {
                Some(status) => status,
                None => return Ok(Vec::new()),
            },
        };

        let db = self.db.lock()?;
        let conn = db.conn();
        cases::list(conn, status)?
            .into_iter()
            .map(|case| detail(conn, case, includes))
            .collect()
    }

    pub fn get(&self, id: i64, includes: CaseIncludes) -> ServiceResult<CaseDetail> {
        let db = self.db.lock()?;
        let case = cases::find_visible(db.conn(), id)?.ok_or(ServiceError::NotFound)?;
        detail(db.conn(), case, includes)
    }

    /// Creates a case for an existing patient (`patientId`) or for a new one (`patient`).
    ///
    /// With a nested patient both rows are written in one transaction.
    pub fn create(&self, req: &CaseReq) -> ServiceResult<CaseDetail> {
        let mut db = self.db.lock()?;

        if let Some(patient_id) = req.patient_id {
            let patient = patients::find(db.conn(), patient_id)?.ok_or(ServiceError::NotFound)?;
            let case = cases::insert(db.conn(), &NewCase::from_req(patient.id, req))?;
            return Ok(CaseDetail {
                case,
                patient,
                attachments: None,
                procedures: None,
            });
        }

        let Some(patient_req) = &req.patient else {
            return Err(ServiceError::MissingParameter(
                "Missing patient: supply patientId or patient".into(),
            ));
        };
        let new_patient = NewPatient::from_req(patient_req).map_err(|err| match err {
            ServiceError::Validation(msg) => ServiceError::Validation(format!("patient {msg}")),
            other => other,
        })?;

        let tx = db.transaction()?;
        let patient = patients::insert(&tx, &new_patient)?;
        let case = cases::insert(&tx, &NewCase::from_req(patient.id, req))?;
        tx.commit()?;

        Ok(CaseDetail {
            case,
            patient,
            attachments: None,
            procedures: None,
        })
    }

    /// Applies anatomy/side changes. `patientId` and `patient` in `req` are ignored.
    pub fn update(&self, id: i64, req: &CaseReq) -> ServiceResult<CaseDetail> {
        let changes = CaseChanges::from_req(req);
        let db = self.db.lock()?;
        let mut case = cases::find_visible(db.conn(), id)?.ok_or(ServiceError::NotFound)?;
        changes.apply(&mut case);
        let case = cases::update(db.conn(), &case)?;
        detail(db.conn(), case, CaseIncludes::default())
    }

    /// Soft-deletes the case alone.
    pub fn delete(&self, id: i64) -> ServiceResult<()> {
        let mut db = self.db.lock()?;
        let case = cases::find_visible(db.conn(), id)?.ok_or(ServiceError::NotFound)?;
        db.soft_delete(&case)?;
        Ok(())
    }
}

fn detail(conn: &Connection, case: Case, includes: CaseIncludes) -> ServiceResult<CaseDetail> {
    let patient = patients::find(conn, case.patient_id)?.ok_or(ServiceError::NotFound)?;
    let attachments = if includes.attachments {
        Some(attachments::list_for_record(conn, RecordRef::Case(case.id))?)
    } else {
        None
    };
    let procedures = if includes.procedures {
        Some(procedures::list_for_case(conn, case.id)?)
    } else {
        None
    };
    Ok(CaseDetail {
        case,
        patient,
        attachments,
        procedures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::{patient, shared_db};
    use crate::repositories::PatientService;
    use api_shared::dto::PatientReq;

    fn knee(patient_id: i64) -> CaseReq {
        CaseReq {
            patient_id: Some(patient_id),
            anatomy: Some("knee".into()),
            side: Some("left".into()),
            ..Default::default()
        }
    }

    #[test]
    fn create_with_nested_patient_inserts_both() {
        let db = shared_db();
        let service = CaseService::new(db.clone());

        let created = service
            .create(&CaseReq {
                patient: Some(PatientReq {
                    name: Some("Maria Lopez".into()),
                    ..Default::default()
                }),
                anatomy: Some("hip".into()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(created.patient.name, "Maria Lopez");
        assert_eq!(created.case.patient_id, created.patient.id);
        assert_eq!(PatientService::new(db).list(false).unwrap().len(), 1);
    }

    #[test]
    fn create_without_owner_mentions_patient() {
        let service = CaseService::new(shared_db());
        let err = service.create(&CaseReq::default()).unwrap_err();
        assert!(matches!(err, ServiceError::MissingParameter(_)));
        assert!(err.to_string().to_lowercase().contains("patient"));
    }

    #[test]
    fn create_with_invalid_nested_patient_writes_nothing() {
        let db = shared_db();
        let service = CaseService::new(db.clone());
        let err = service
            .create(&CaseReq {
                patient: Some(PatientReq::default()),
                ..Default::default()
            })
            .unwrap_err();
        assert!(err.to_string().contains("name"));
        assert!(service.list(None, CaseIncludes::default()).unwrap().is_empty());
    }

    #[test]
    fn create_with_unknown_patient_is_not_found() {
        let service = CaseService::new(shared_db());
        assert!(matches!(service.create(&knee(42)), Err(ServiceError::NotFound)));
    }

    #[test]
    fn update_ignores_patient_reassignment() {
        let db = shared_db();
        let owner = patient(&db, "Ana");
        let other = patient(&db, "Luis");
        let service = CaseService::new(db);
        let created = service.create(&knee(owner)).unwrap();

        let updated = service
            .update(
                created.case.id,
                &CaseReq {
                    patient_id: Some(other),
                    side: Some("right".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.case.patient_id, owner);
        assert_eq!(updated.case.side.as_deref(), Some("right"));
        assert_eq!(updated.case.anatomy.as_deref(), Some("knee"));
    }

    #[test]
    fn status_filter_never_exposes_deleted_cases() {
        let db = shared_db();
        let owner = patient(&db, "Ana");
        let service = CaseService::new(db);
        let first = service.create(&knee(owner)).unwrap();
        service.create(&knee(owner)).unwrap();
        service.delete(first.case.id).unwrap();

        let none = CaseIncludes::default();
        assert_eq!(service.list(None, none).unwrap().len(), 1);
        assert_eq!(service.list(Some("active"), none).unwrap().len(), 1);
        assert!(service.list(Some("deleted"), none).unwrap().is_empty());
        assert!(service.list(Some("bogus"), none).unwrap().is_empty());
        assert!(matches!(
            service.get(first.case.id, CaseIncludes::default()),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn includes_are_opt_in() {
        let db = shared_db();
        let owner = patient(&db, "Ana");
        let service = CaseService::new(db);
        let created = service.create(&knee(owner)).unwrap();

        let bare = service.get(created.case.id, CaseIncludes::default()).unwrap();
        assert!(bare.attachments.is_none());
        assert!(bare.procedures.is_none());

        let full = service
            .get(
                created.case.id,
                CaseIncludes {
                    attachments: true,
                    procedures: true,
                },
            ).unwrap();
        assert_eq!(full.attachments, Some(Vec::new()));
        assert_eq!(full.procedures, Some(Vec::new()));
    }
}
