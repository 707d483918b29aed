use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::extract::{Payload, RecordId};
use crate::presenters::{self, MissionView, TeamView};
use crate::version::ApiVersion;
use crate::AppState;
use api_shared::dto::{MissionReq, TeamReq};
use axum::extract::State;

#[utoipa::path(
    get,
    path = "/teams",
    responses((status = 200, description = "All teams")),
    security(("token" = []))
)]
pub async fn list_teams(
    State(state): State<AppState>,
    version: ApiVersion,
) -> Result<Envelope<Vec<TeamView>>, ApiError> {
    let teams = state.teams.list_teams()?;
    Ok(Envelope::ok(
        version.root("teams"),
        teams.iter().map(|team| presenters::team(version, team)).collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/teams/{id}",
    params(("id" = i64, Path, description = "Team id")),
    responses(
        (status = 200, description = "The team"),
        (status = 404, description = "Unknown team")
    ),
    security(("token" = []))
)]
pub async fn show_team(
    State(state): State<AppState>,
    version: ApiVersion,
    RecordId(id): RecordId,
) -> Result<Envelope<TeamView>, ApiError> {
    let team = state.teams.get_team(id)?;
    Ok(Envelope::ok(version.root("team"), presenters::team(version, &team)))
}

#[utoipa::path(
    post,
    path = "/teams",
    request_body = TeamReq,
    responses(
        (status = 201, description = "Team created"),
        (status = 400, description = "Missing name")
    ),
    security(("token" = []))
)]
pub async fn create_team(
    State(state): State<AppState>,
    version: ApiVersion,
    Payload(req): Payload<TeamReq>,
) -> Result<Envelope<TeamView>, ApiError> {
    let team = state.teams.create_team(&req)?;
    Ok(Envelope::created(
        version.root("team"),
        presenters::team(version, &team),
    ))
}

#[utoipa::path(
    get,
    path = "/missions",
    responses((status = 200, description = "All missions")),
    security(("token" = []))
)]
pub async fn list_missions(
    State(state): State<AppState>,
    version: ApiVersion,
) -> Result<Envelope<Vec<MissionView>>, ApiError> {
    let missions = state.teams.list_missions()?;
    Ok(Envelope::ok(
        version.root("missions"),
        missions
            .iter()
            .map(|detail| presenters::mission(version, detail))
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/missions/{id}",
    params(("id" = i64, Path, description = "Mission id")),
    responses(
        (status = 200, description = "The mission with its teams"),
        (status = 404, description = "Unknown mission")
    ),
    security(("token" = []))
)]
pub async fn show_mission(
    State(state): State<AppState>,
    version: ApiVersion,
    RecordId(id): RecordId,
) -> Result<Envelope<MissionView>, ApiError> {
    let detail = state.teams.get_mission(id)?;
    Ok(Envelope::ok(
        version.root("mission"),
        presenters::mission(version, &detail),
    ))
}

#[utoipa::path(
    post,
    path = "/missions",
    request_body = MissionReq,
    responses(
        (status = 201, description = "Mission created"),
        (status = 400, description = "Missing name"),
        (status = 404, description = "Unknown team id")
    ),
    security(("token" = []))
)]
pub async fn create_mission(
    State(state): State<AppState>,
    version: ApiVersion,
    Payload(req): Payload<MissionReq>,
) -> Result<Envelope<MissionView>, ApiError> {
    let detail = state.teams.create_mission(&req)?;
    Ok(Envelope::created(
        version.root("mission"),
        presenters::mission(version, &detail),
    ))
}
