//! Request payloads.
//!
//! These are the shapes clients send on write endpoints, whether as JSON or as form-encoded
//! bodies. Every field is optional at this layer; presence and format rules are enforced by the
//! services in `mission-core` so that error messages can name the offending field.
//!
//! Unknown keys (including `status`) are ignored.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientReq {
    pub name: Option<String>,
    /// `YYYY-MM-DD`
    pub birth: Option<String>,
    /// `YYYY-MM-DD`
    pub death: Option<String>,
    pub gender: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaseReq {
    #[serde(default, deserialize_with = "lenient::optional_id")]
    pub patient_id: Option<i64>,
    /// Creates a new patient for the case when `patientId` is absent.
    pub patient: Option<PatientReq>,
    pub anatomy: Option<String>,
    pub side: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentReq {
    #[serde(default, deserialize_with = "lenient::optional_id")]
    pub patient_id: Option<i64>,
    /// Accepted for client convenience, never applied.
    pub patient: Option<PatientReq>,
    #[serde(default, deserialize_with = "lenient::optional_id")]
    pub trip_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::optional_id")]
    pub order: Option<i64>,
    pub location: Option<String>,
    /// RFC 3339 timestamp
    pub start: Option<String>,
    /// RFC 3339 timestamp
    pub end: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentReq {
    #[serde(default, deserialize_with = "lenient::optional_id")]
    pub record_id: Option<i64>,
    /// `Patient`, `Case`, `Appointment` or `Procedure`
    pub record_type: Option<String>,
    pub description: Option<String>,
    /// Base64-encoded document bytes
    pub data: Option<String>,
    pub content_type: Option<String>,
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcedureReq {
    #[serde(default, deserialize_with = "lenient::optional_id")]
    pub case_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::optional_id")]
    pub appointment_id: Option<i64>,
    /// Free-form procedure details (date, type, version, providers...)
    #[schema(value_type = Option<Object>)]
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamReq {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MissionReq {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_ids")]
    pub team_ids: Option<Vec<i64>>,
}

/// Deserializers that accept ids as JSON numbers or numeric strings.
///
/// Form-encoded bodies carry every value as a string, JSON clients usually send numbers.
pub mod lenient {
    use serde::{de, Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Int(i64),
        Text(String),
    }

    fn parse<E: de::Error>(raw: RawId) -> Result<Option<i64>, E> {
        match raw {
            RawId::Int(value) => Ok(Some(value)),
            RawId::Text(text) if text.trim().is_empty() => Ok(None),
            RawId::Text(text) => text
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| E::custom(format!("invalid id: {text}"))),
        }
    }

    pub fn optional_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<RawId>::deserialize(deserializer)? {
            Some(raw) => parse(raw),
            None => Ok(None),
        }
    }

    pub fn optional_ids<'de, D>(deserializer: D) -> Result<Option<Vec<i64>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = Option::<Vec<RawId>>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let mut ids = Vec::with_capacity(raw.len());
        for item in raw {
            if let Some(id) = parse(item)? {
                ids.push(id);
            }
        }
        Ok(Some(ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ids_accept_numbers_and_strings() {
        let from_number: CaseReq = serde_json::from_value(json!({"patientId": 7})).unwrap();
        let from_string: CaseReq = serde_json::from_value(json!({"patientId": "7"})).unwrap();
        let blank: CaseReq = serde_json::from_value(json!({"patientId": ""})).unwrap();
        let absent: CaseReq = serde_json::from_value(json!({})).unwrap();

        assert_eq!(from_number.patient_id, Some(7));
        assert_eq!(from_string.patient_id, Some(7));
        assert_eq!(blank.patient_id, None);
        assert_eq!(absent.patient_id, None);
    }

    #[test]
    fn non_numeric_id_is_rejected() {
        let parsed: Result<AppointmentReq, _> =
            serde_json::from_value(json!({"patientId": "seven"}));
        assert!(parsed.is_err());
    }

    #[test]
    fn status_key_is_ignored() {
        let parsed: PatientReq =
            serde_json::from_value(json!({"name": "Ana", "status": "deleted"})).unwrap();
        assert_eq!(parsed.name.as_deref(), Some("Ana"));
    }

    #[test]
    fn mission_team_ids_mix_types() {
        let parsed: MissionReq =
            serde_json::from_value(json!({"name": "Guatemala 2015", "teamIds": [1, "2"]}))
                .unwrap();
        assert_eq!(parsed.team_ids, Some(vec![1, 2]));
    }

    #[test]
    fn nested_patient_on_case() {
        let parsed: CaseReq = serde_json::from_value(json!({
            "patient": {"name": "Juan Marco", "birth": "1977-08-12"},
            "anatomy": "knee"
        }))
        .unwrap();
        assert_eq!(parsed.patient_id, None);
        assert_eq!(
            parsed.patient.and_then(|p| p.name).as_deref(),
            Some("Juan Marco")
        );
    }
}
