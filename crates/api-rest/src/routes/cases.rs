use crate::envelope::{Deleted, Envelope};
use crate::error::ApiError;
use crate::extract::{flag, Params, Payload, RecordId};
use crate::presenters::{self, CaseView};
use crate::version::ApiVersion;
use crate::AppState;
use api_shared::dto::CaseReq;
use axum::extract::State;
use mission_core::repositories::CaseIncludes;
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// `active` (default); any other value lists nothing
    status: Option<String>,
    show_attachments: Option<String>,
    show_procedures: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ShowParams {
    show_attachments: Option<String>,
    show_procedures: Option<String>,
}

fn includes(show_attachments: Option<&str>, show_procedures: Option<&str>) -> CaseIncludes {
    CaseIncludes {
        attachments: flag(show_attachments),
        procedures: flag(show_procedures),
    }
}

#[utoipa::path(
    get,
    path = "/cases",
    params(ListParams),
    responses((status = 200, description = "Cases of active patients")),
    security(("token" = []))
)]
pub async fn list(
    State(state): State<AppState>,
    version: ApiVersion,
    Params(params): Params<ListParams>,
) -> Result<Envelope<Vec<CaseView>>, ApiError> {
    let cases = state.cases.list(
        params.status.as_deref(),
        includes(
            params.show_attachments.as_deref(),
            params.show_procedures.as_deref(),
        ),
    )?;
    Ok(Envelope::ok(
        version.root("cases"),
        cases
            .iter()
            .map(|detail| presenters::case(version, detail))
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/cases/{id}",
    params(("id" = i64, Path, description = "Case id"), ShowParams),
    responses(
        (status = 200, description = "The case"),
        (status = 404, description = "Unknown or deleted case, or deleted patient")
    ),
    security(("token" = []))
)]
pub async fn show(
    State(state): State<AppState>,
    version: ApiVersion,
    RecordId(id): RecordId,
    Params(params): Params<ShowParams>,
) -> Result<Envelope<CaseView>, ApiError> {
    let detail = state.cases.get(
        id,
        includes(
            params.show_attachments.as_deref(),
            params.show_procedures.as_deref(),
        ),
    )?;
    Ok(Envelope::ok(version.root("case"), presenters::case(version, &detail)))
}

#[utoipa::path(
    post,
    path = "/cases",
    request_body = CaseReq,
    responses(
        (status = 201, description = "Case created"),
        (status = 400, description = "Neither patientId nor patient supplied"),
        (status = 404, description = "Unknown patientId")
    ),
    security(("token" = []))
)]
pub async fn create(
    State(state): State<AppState>,
    version: ApiVersion,
    Payload(req): Payload<CaseReq>,
) -> Result<Envelope<CaseView>, ApiError> {
    let detail = state.cases.create(&req)?;
    Ok(Envelope::created(
        version.root("case"),
        presenters::case(version, &detail),
    ))
}

#[utoipa::path(
    put,
    path = "/cases/{id}",
    params(("id" = i64, Path, description = "Case id")),
    request_body = CaseReq,
    responses(
        (status = 200, description = "Case updated; patientId and patient are ignored"),
        (status = 404, description = "Unknown or deleted case")
    ),
    security(("token" = []))
)]
pub async fn update(
    State(state): State<AppState>,
    version: ApiVersion,
    RecordId(id): RecordId,
    Payload(req): Payload<CaseReq>,
) -> Result<Envelope<CaseView>, ApiError> {
    let detail = state.cases.update(id, &req)?;
    Ok(Envelope::ok(version.root("case"), presenters::case(version, &detail)))
}

#[utoipa::path(
    delete,
    path = "/cases/{id}",
    params(("id" = i64, Path, description = "Case id")),
    responses(
        (status = 200, description = "Case soft-deleted"),
        (status = 404, description = "Unknown or deleted case")
    ),
    security(("token" = []))
)]
pub async fn destroy(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> Result<Envelope<Deleted>, ApiError> {
    state.cases.delete(id)?;
    Ok(Deleted::envelope("Case"))
}
