use crate::envelope::{Deleted, Envelope};
use crate::error::ApiError;
use crate::extract::{Params, Payload, RecordId};
use crate::presenters::{self, AppointmentView};
use crate::version::ApiVersion;
use crate::AppState;
use api_shared::dto::AppointmentReq;
use axum::extract::State;
use mission_core::db::appointments::AppointmentFilter;
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Exact trip id
    trip_id: Option<String>,
    /// Exact location
    location: Option<String>,
}

impl ListParams {
    fn filter(self) -> Result<AppointmentFilter, ApiError> {
        let trip_id = match self.trip_id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse()
                    .map_err(|_| ApiError::Validation("tripId must be an integer".into()))?,
            ),
        };
        Ok(AppointmentFilter {
            trip_id,
            location: self.location.filter(|l| !l.is_empty()),
        })
    }
}

#[utoipa::path(
    get,
    path = "/appointments",
    params(ListParams),
    responses(
        (status = 200, description = "Appointments of active patients"),
        (status = 400, description = "tripId is not an integer")
    ),
    security(("token" = []))
)]
pub async fn list(
    State(state): State<AppState>,
    version: ApiVersion,
    Params(params): Params<ListParams>,
) -> Result<Envelope<Vec<AppointmentView>>, ApiError> {
    let appointments = state.appointments.list(&params.filter()?)?;
    Ok(Envelope::ok(
        version.root("appointments"),
        appointments
            .iter()
            .map(|detail| presenters::appointment(version, detail))
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/appointments/{id}",
    params(("id" = i64, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "The appointment"),
        (status = 404, description = "Unknown appointment, or its patient is deleted")
    ),
    security(("token" = []))
)]
pub async fn show(
    State(state): State<AppState>,
    version: ApiVersion,
    RecordId(id): RecordId,
) -> Result<Envelope<AppointmentView>, ApiError> {
    let detail = state.appointments.get(id)?;
    Ok(Envelope::ok(
        version.root("appointment"),
        presenters::appointment(version, &detail),
    ))
}

#[utoipa::path(
    post,
    path = "/appointments",
    request_body = AppointmentReq,
    responses(
        (status = 201, description = "Appointment created"),
        (status = 400, description = "Missing patient id"),
        (status = 404, description = "Unknown or deleted patient")
    ),
    security(("token" = []))
)]
pub async fn create(
    State(state): State<AppState>,
    version: ApiVersion,
    Payload(req): Payload<AppointmentReq>,
) -> Result<Envelope<AppointmentView>, ApiError> {
    let detail = state.appointments.create(&req)?;
    Ok(Envelope::created(
        version.root("appointment"),
        presenters::appointment(version, &detail),
    ))
}

#[utoipa::path(
    put,
    path = "/appointments/{id}",
    params(("id" = i64, Path, description = "Appointment id")),
    request_body = AppointmentReq,
    responses(
        (status = 200, description = "Appointment updated"),
        (status = 400, description = "patientId differs from the appointment's patient"),
        (status = 404, description = "Unknown appointment")
    ),
    security(("token" = []))
)]
pub async fn update(
    State(state): State<AppState>,
    version: ApiVersion,
    RecordId(id): RecordId,
    Payload(req): Payload<AppointmentReq>,
) -> Result<Envelope<AppointmentView>, ApiError> {
    let detail = state.appointments.update(id, &req)?;
    Ok(Envelope::ok(
        version.root("appointment"),
        presenters::appointment(version, &detail),
    ))
}

#[utoipa::path(
    delete,
    path = "/appointments/{id}",
    params(("id" = i64, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment removed"),
        (status = 404, description = "Unknown appointment")
    ),
    security(("token" = []))
)]
pub async fn destroy(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> Result<Envelope<Deleted>, ApiError> {
    state.appointments.delete(id)?;
    Ok(Deleted::envelope("Appointment"))
}
