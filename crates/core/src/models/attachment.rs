//! Attachments: documents linked to a patient, case, appointment or procedure.

use crate::error::{ServiceError, ServiceResult};
use crate::validation::optional_text;
use api_shared::dto::AttachmentReq;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The record an attachment hangs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordRef {
    Patient(i64),
    Case(i64),
    Appointment(i64),
    Procedure(i64),
}

impl RecordRef {
    /// Builds a reference from a client-supplied type name (case-insensitive).
    pub fn parse(record_type: &str, id: i64) -> Option<Self> {
        match record_type.trim().to_ascii_lowercase().as_str() {
            "patient" => Some(Self::Patient(id)),
            "case" => Some(Self::Case(id)),
            "appointment" => Some(Self::Appointment(id)),
            "procedure" => Some(Self::Procedure(id)),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Patient(_) => "Patient",
            Self::Case(_) => "Case",
            Self::Appointment(_) => "Appointment",
            Self::Procedure(_) => "Procedure",
        }
    }

    pub fn id(&self) -> i64 {
        match *self {
            Self::Patient(id) | Self::Case(id) | Self::Appointment(id) | Self::Procedure(id) => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: i64,
    pub record: RecordRef,
    pub description: Option<String>,
    pub document_file_name: String,
    pub document_content_type: String,
    pub document_file_size: i64,
    /// Blob store key for the document bytes.
    pub document_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A decoded upload, ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAttachment {
    pub record: RecordRef,
    pub description: Option<String>,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl NewAttachment {
    /// Validates an upload request.
    ///
    /// All absent required fields are reported together. An unrecognised `recordType` is
    /// reported as [`ServiceError::NotFound`], since no such record can exist.
    pub fn from_req(req: &AttachmentReq) -> ServiceResult<Self> {
        let record_type = optional_text(req.record_type.as_deref());
        let data = req.data.as_deref().map(str::trim).filter(|d| !d.is_empty());
        let content_type = optional_text(req.content_type.as_deref());
        let file_name = optional_text(req.file_name.as_deref());

        let mut missing = Vec::new();
        if req.record_id.is_none() {
            missing.push("recordId");
        }
        if record_type.is_none() {
            missing.push("recordType");
        }
        if data.is_none() {
            missing.push("data");
        }
        if content_type.is_none() {
            missing.push("contentType");
        }
        if file_name.is_none() {
            missing.push("fileName");
        }

        let (Some(record_id), Some(record_type), Some(data), Some(content_type), Some(file_name)) =
            (req.record_id, record_type, data, content_type, file_name)
        else {
            return Err(ServiceError::missing(&missing));
        };

        let record = RecordRef::parse(&record_type, record_id).ok_or(ServiceError::NotFound)?;
        let bytes = STANDARD
            .decode(data)
            .map_err(|_| ServiceError::Validation("data is not valid base64".into()))?;

        Ok(Self {
            record,
            description: optional_text(req.description.as_deref()),
            file_name,
            content_type,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload() -> AttachmentReq {
        AttachmentReq {
            record_id: Some(3),
            record_type: Some("case".into()),
            description: Some("x-ray".into()),
            data: Some(STANDARD.encode(b"%PDF-1.4")),
            content_type: Some("application/pdf".into()),
            file_name: Some("xray.pdf".into()),
        }
    }

    #[test]
    fn decodes_payload() {
        let new = NewAttachment::from_req(&upload()).unwrap();
        assert_eq!(new.record, RecordRef::Case(3));
        assert_eq!(new.bytes, b"%PDF-1.4");
        assert_eq!(new.file_name, "xray.pdf");
    }

    #[test]
    fn reports_every_missing_field() {
        let err = NewAttachment::from_req(&AttachmentReq {
            description: Some("only this".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing recordId, recordType, data, contentType, fileName"
        );
    }

    #[test]
    fn unknown_record_type_is_not_found() {
        let req = AttachmentReq {
            record_type: Some("Trip".into()),
            ..upload()
        };
        assert!(matches!(
            NewAttachment::from_req(&req),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn invalid_base64_names_data() {
        let req = AttachmentReq {
            data: Some("***".into()),
            ..upload()
        };
        let err = NewAttachment::from_req(&req).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(err.to_string().starts_with("data"));
    }

    #[test]
    fn record_type_is_case_insensitive() {
        assert_eq!(RecordRef::parse("PATIENT", 1), Some(RecordRef::Patient(1)));
        assert_eq!(RecordRef::Procedure(9).type_name(), "Procedure");
    }
}
