use crate::envelope::{Deleted, Envelope};
use crate::error::ApiError;
use crate::extract::{flag, Params, Payload, RecordId};
use crate::presenters::{self, PatientView};
use crate::version::ApiVersion;
use crate::AppState;
use api_shared::dto::PatientReq;
use axum::extract::State;
use mission_core::models::PatientDetail;
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ShowParams {
    /// Include each patient's active cases
    show_cases: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Case-insensitive substring of the patient's name
    q: Option<String>,
}

#[utoipa::path(
    get,
    path = "/patients",
    params(ShowParams),
    responses(
        (status = 200, description = "Active patients"),
        (status = 401, description = "Bad credentials")
    ),
    security(("token" = []))
)]
pub async fn list(
    State(state): State<AppState>,
    version: ApiVersion,
    Params(params): Params<ShowParams>,
) -> Result<Envelope<Vec<PatientView>>, ApiError> {
    let patients = state.patients.list(flag(params.show_cases.as_deref()))?;
    Ok(Envelope::ok(
        version.root("patients"),
        patients
            .iter()
            .map(|detail| presenters::patient(version, detail))
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/patients/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Active patients whose name contains q; empty when q is blank")
    ),
    security(("token" = []))
)]
pub async fn search(
    State(state): State<AppState>,
    version: ApiVersion,
    Params(params): Params<SearchParams>,
) -> Result<Envelope<Vec<PatientView>>, ApiError> {
    let patients = state.patients.search(params.q.as_deref())?;
    Ok(Envelope::ok(
        version.root("patients"),
        patients
            .into_iter()
            .map(|patient| presenters::patient(version, &PatientDetail { patient, cases: None }))
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    params(("id" = i64, Path, description = "Patient id"), ShowParams),
    responses(
        (status = 200, description = "The patient"),
        (status = 404, description = "Unknown or deleted patient")
    ),
    security(("token" = []))
)]
pub async fn show(
    State(state): State<AppState>,
    version: ApiVersion,
    RecordId(id): RecordId,
    Params(params): Params<ShowParams>,
) -> Result<Envelope<PatientView>, ApiError> {
    let detail = state.patients.get(id, flag(params.show_cases.as_deref()))?;
    Ok(Envelope::ok(
        version.root("patient"),
        presenters::patient(version, &detail),
    ))
}

#[utoipa::path(
    post,
    path = "/patients",
    request_body = PatientReq,
    responses(
        (status = 201, description = "Patient created"),
        (status = 400, description = "Validation failure naming the field")
    ),
    security(("token" = []))
)]
pub async fn create(
    State(state): State<AppState>,
    version: ApiVersion,
    Payload(req): Payload<PatientReq>,
) -> Result<Envelope<PatientView>, ApiError> {
    let patient = state.patients.create(&req)?;
    Ok(Envelope::created(
        version.root("patient"),
        presenters::patient(version, &PatientDetail { patient, cases: None }),
    ))
}

#[utoipa::path(
    put,
    path = "/patients/{id}",
    params(("id" = i64, Path, description = "Patient id")),
    request_body = PatientReq,
    responses(
        (status = 200, description = "Patient updated"),
        (status = 400, description = "Validation failure naming the field"),
        (status = 404, description = "Unknown or deleted patient")
    ),
    security(("token" = []))
)]
pub async fn update(
    State(state): State<AppState>,
    version: ApiVersion,
    RecordId(id): RecordId,
    Payload(req): Payload<PatientReq>,
) -> Result<Envelope<PatientView>, ApiError> {
    let patient = state.patients.update(id, &req)?;
    Ok(Envelope::ok(
        version.root("patient"),
        presenters::patient(version, &PatientDetail { patient, cases: None }),
    ))
}

#[utoipa::path(
    delete,
    path = "/patients/{id}",
    params(("id" = i64, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Patient and its cases soft-deleted"),
        (status = 404, description = "Unknown or deleted patient")
    ),
    security(("token" = []))
)]
pub async fn destroy(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> Result<Envelope<Deleted>, ApiError> {
    state.patients.delete(id)?;
    Ok(Deleted::envelope("Patient"))
}
