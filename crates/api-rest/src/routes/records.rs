//! Attachments and procedures: create-only resources hanging off other records.

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::extract::Payload;
use crate::presenters::{self, AttachmentView, ProcedureView};
use crate::version::ApiVersion;
use crate::AppState;
use api_shared::dto::{AttachmentReq, ProcedureReq};
use axum::extract::State;

#[utoipa::path(
    post,
    path = "/attachments",
    request_body = AttachmentReq,
    responses(
        (status = 201, description = "Document stored"),
        (status = 400, description = "Missing fields, named in the message"),
        (status = 404, description = "recordType/recordId does not resolve")
    ),
    security(("token" = []))
)]
pub async fn create_attachment(
    State(state): State<AppState>,
    version: ApiVersion,
    Payload(req): Payload<AttachmentReq>,
) -> Result<Envelope<AttachmentView>, ApiError> {
    let attachment = state.attachments.create(&req)?;
    Ok(Envelope::created(
        version.root("attachment"),
        presenters::attachment(version, &attachment),
    ))
}

#[utoipa::path(
    post,
    path = "/procedures",
    request_body = ProcedureReq,
    responses(
        (status = 201, description = "Procedure recorded"),
        (status = 400, description = "Missing case id"),
        (status = 404, description = "Unknown case or appointment")
    ),
    security(("token" = []))
)]
pub async fn create_procedure(
    State(state): State<AppState>,
    version: ApiVersion,
    Payload(req): Payload<ProcedureReq>,
) -> Result<Envelope<ProcedureView>, ApiError> {
    let procedure = state.procedures.create(&req)?;
    Ok(Envelope::created(
        version.root("procedure"),
        presenters::procedure(version, &procedure),
    ))
}
