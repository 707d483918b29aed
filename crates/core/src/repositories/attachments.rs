//! Attachment uploads.
//!
//! The document bytes go to the [`BlobStore`]; the relational store keeps the metadata and the
//! blob's hash. The metadata row is written first and only committed once the blob is stored, so
//! a failed upload leaves no row. A commit that fails after the blob landed leaves an unreferenced
//! blob; identical content uploaded later reuses it.

use crate::db::{appointments, attachments, cases, patients, procedures, SharedDatabase};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{Attachment, NewAttachment, RecordRef};
use api_shared::dto::AttachmentReq;
use mission_files::{BlobStore, Sha256Hash};
use rusqlite::Connection;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct AttachmentService {
    db: SharedDatabase,
    blobs: Arc<dyn BlobStore>,
}

impl AttachmentService {
    pub fn new(db: SharedDatabase, blobs: Arc<dyn BlobStore>) -> Self {
        Self { db, blobs }
    }

    /// Stores an uploaded document against an existing, visible record.
    pub fn create(&self, req: &AttachmentReq) -> ServiceResult<Attachment> {
        let new = NewAttachment::from_req(req)?;
        let mut db = self.db.lock()?;
        let tx = db.transaction()?;

        if !record_exists(&tx, new.record)? {
            return Err(ServiceError::NotFound);
        }

        let hash = Sha256Hash::of(&new.bytes);
        let attachment = attachments::insert(&tx, &new, hash.as_str())?;
        self.blobs.put(&new.bytes, &new.file_name)?;
        tx.commit()?;
        tracing::debug!(
            id = attachment.id,
            record_type = new.record.type_name(),
            record_id = new.record.id(),
            "attachment stored"
        );
        Ok(attachment)
    }
}

/// Resolves a polymorphic parent through the same visibility rules as its own endpoint.
fn record_exists(conn: &Connection, record: RecordRef) -> ServiceResult<bool> {
    let found = match record {
        RecordRef::Patient(id) => patients::find_active(conn, id)?.is_some(),
        RecordRef::Case(id) => cases::find_visible(conn, id)?.is_some(),
        RecordRef::Appointment(id) => appointments::find_visible(conn, id)?.is_some(),
        RecordRef::Procedure(id) => procedures::find_visible(conn, id)?.is_some(),
    };
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::{patient, shared_db};
    use crate::repositories::{CaseIncludes, CaseService};
    use api_shared::dto::CaseReq;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use mission_files::{FileMetadata, FilesError, FilesService};
    use tempfile::TempDir;

    fn service(db: crate::db::SharedDatabase) -> (TempDir, AttachmentService) {
        let temp = TempDir::new().unwrap();
        let blobs = FilesService::new(temp.path()).unwrap();
        (temp, AttachmentService::new(db, Arc::new(blobs)))
    }

    fn upload(record_type: &str, record_id: i64) -> AttachmentReq {
        AttachmentReq {
            record_id: Some(record_id),
            record_type: Some(record_type.into()),
            description: Some("pre-op x-ray".into()),
            data: Some(STANDARD.encode(b"\x89PNG\r\n\x1a\nfake")),
            content_type: Some("image/png".into()),
            file_name: Some("xray.png".into()),
        }
    }

    #[test]
    fn stores_blob_and_metadata() {
        let db = shared_db();
        let owner = patient(&db, "Ana");
        let case = CaseService::new(db.clone())
            .create(&CaseReq {
                patient_id: Some(owner),
                ..Default::default()
            })
            .unwrap();
        let (_temp, service) = service(db.clone());

        let attachment = service.create(&upload("Case", case.case.id)).unwrap();

        assert_eq!(attachment.record, RecordRef::Case(case.case.id));
        assert_eq!(attachment.document_file_name, "xray.png");
        assert_eq!(attachment.document_content_type, "image/png");
        assert_eq!(attachment.document_file_size, 12);
        assert_eq!(
            service.blobs.read(&attachment.document_hash).unwrap(),
            b"\x89PNG\r\n\x1a\nfake"
        );

        let shown = CaseService::new(db)
            .get(
                case.case.id,
                CaseIncludes {
                    attachments: true,
                    procedures: false,
                },
            )
            .unwrap();
        assert_eq!(shown.attachments.map(|a| a.len()), Some(1));
    }

    #[derive(Debug)]
    struct UnwritableStore;

    impl BlobStore for UnwritableStore {
        fn put(&self, _bytes: &[u8], _file_name: &str) -> Result<FileMetadata, FilesError> {
            Err(FilesError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only volume",
            )))
        }

        fn read(&self, hash: &str) -> Result<Vec<u8>, FilesError> {
            Err(FilesError::InvalidHash(hash.to_string()))
        }
    }

    #[test]
    fn failed_blob_write_leaves_no_metadata() {
        let db = shared_db();
        let owner = patient(&db, "Ana");
        let service = AttachmentService::new(db.clone(), Arc::new(UnwritableStore));

        let result = service.create(&upload("Patient", owner));

        assert!(matches!(result, Err(ServiceError::Files(_))));
        let guard = db.lock().unwrap();
        assert!(attachments::list_for_record(guard.conn(), RecordRef::Patient(owner))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn metadata_hash_addresses_the_blob() {
        let db = shared_db();
        let owner = patient(&db, "Ana");
        let (_temp, service) = service(db);

        let attachment = service.create(&upload("Patient", owner)).unwrap();

        assert_eq!(
            attachment.document_hash,
            Sha256Hash::of(b"\x89PNG\r\n\x1a\nfake").as_str()
        );
    }

    #[test]
    fn missing_parent_is_not_found() {
        let db = shared_db();
        let (_temp, service) = service(db);
        assert!(matches!(
            service.create(&upload("Case", 999)),
            Err(ServiceError::NotFound)
        ));
        assert!(matches!(
            service.create(&upload("Trip", 1)),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn patient_parent_must_be_active() {
        let db = shared_db();
        let owner = patient(&db, "Ana");
        crate::repositories::PatientService::new(db.clone())
            .delete(owner)
            .unwrap();
        let (_temp, service) = service(db);
        assert!(matches!(
            service.create(&upload("patient", owner)),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn missing_fields_are_named() {
        let db = shared_db();
        let (_temp, service) = service(db);
        let err = service
            .create(&AttachmentReq {
                file_name: None,
                ..upload("Case", 1)
            })
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing fileName");
    }
}
