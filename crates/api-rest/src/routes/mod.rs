//! Route table and OpenAPI document.
//!
//! Resource routes sit behind [`pipeline::gate`] for every method, including ones the route does
//! not serve; `/health` and the documentation routes are public.

pub mod appointments;
pub mod cases;
pub mod patients;
pub mod records;
pub mod teams;

use crate::error::ApiError;
use crate::pipeline;
use crate::AppState;
use api_shared::dto::{
    AppointmentReq, AttachmentReq, CaseReq, MissionReq, PatientReq, ProcedureReq, TeamReq,
};
use api_shared::{HealthRes, HealthService};
use axum::middleware;
use axum::response::Json;
use axum::routing::{get, post, MethodRouter};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Mission API"),
    paths(
        health,
        patients::list,
        patients::search,
        patients::show,
        patients::create,
        patients::update,
        patients::destroy,
        cases::list,
        cases::show,
        cases::create,
        cases::update,
        cases::destroy,
        appointments::list,
        appointments::show,
        appointments::create,
        appointments::update,
        appointments::destroy,
        records::create_attachment,
        records::create_procedure,
        teams::list_teams,
        teams::show_team,
        teams::create_team,
        teams::list_missions,
        teams::show_mission,
        teams::create_mission,
    ),
    components(schemas(
        HealthRes,
        PatientReq,
        CaseReq,
        AppointmentReq,
        AttachmentReq,
        ProcedureReq,
        TeamReq,
        MissionReq,
    )),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "token",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

/// Builds the complete application router.
pub fn router(state: AppState) -> Router {
    let gated = |methods: MethodRouter<AppState>| {
        methods
            .fallback(method_not_allowed)
            .layer(middleware::from_fn_with_state(state.clone(), pipeline::gate))
    };

    let resources = Router::new()
        .route("/patients", gated(get(patients::list).post(patients::create)))
        .route("/patients/search", gated(get(patients::search)))
        .route(
            "/patients/:id",
            gated(
                get(patients::show)
                    .put(patients::update)
                    .delete(patients::destroy),
            ),
        )
        .route("/cases", gated(get(cases::list).post(cases::create)))
        .route(
            "/cases/:id",
            gated(get(cases::show).put(cases::update).delete(cases::destroy)),
        )
        .route(
            "/appointments",
            gated(get(appointments::list).post(appointments::create)),
        )
        .route(
            "/appointments/:id",
            gated(
                get(appointments::show)
                    .put(appointments::update)
                    .delete(appointments::destroy),
            ),
        )
        .route("/attachments", gated(post(records::create_attachment)))
        .route("/procedures", gated(post(records::create_procedure)))
        .route(
            "/teams",
            gated(get(teams::list_teams).post(teams::create_team)),
        )
        .route("/teams/:id", gated(get(teams::show_team)))
        .route(
            "/missions",
            gated(get(teams::list_missions).post(teams::create_mission)),
        )
        .route("/missions/:id", gated(get(teams::show_mission)));

    Router::new()
        .route("/health", get(health))
        .merge(resources)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Liveness probe; needs no credentials.
pub async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
