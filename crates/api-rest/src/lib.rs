//! # API REST
//!
//! HTTP surface of the mission API.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - The request gate: version negotiation, client authentication, Content-Type checks
//! - Versioned presenters and the `{root: data}` response envelope
//! - OpenAPI/Swagger documentation
//!
//! Storage and business rules live in `mission-core`; this crate only translates.

#![warn(rust_2018_idioms)]

pub mod content_type;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod presenters;
pub mod routes;
pub mod version;

use api_shared::{Authenticator, ClientRegistry};
use axum::Router;
use mission_core::repositories::{
    AppointmentService, AttachmentService, CaseService, PatientService, ProcedureService,
    TeamService,
};
use mission_core::{CoreConfig, SharedDatabase};
use mission_files::BlobStore;
use std::sync::Arc;

pub use error::ApiError;
pub use routes::ApiDoc;
pub use version::ApiVersion;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<CoreConfig>,
    pub authenticator: Arc<Authenticator>,
    pub patients: PatientService,
    pub cases: CaseService,
    pub appointments: AppointmentService,
    pub attachments: AttachmentService,
    pub procedures: ProcedureService,
    pub teams: TeamService,
}

impl AppState {
    pub fn new(
        cfg: Arc<CoreConfig>,
        db: SharedDatabase,
        blobs: Arc<dyn BlobStore>,
        registry: Arc<ClientRegistry>,
    ) -> Self {
        let authenticator = Arc::new(Authenticator::new(registry, cfg.environment()));
        Self {
            authenticator,
            patients: PatientService::new(db.clone()),
            cases: CaseService::new(db.clone()),
            appointments: AppointmentService::new(db.clone()),
            attachments: AttachmentService::new(db.clone(), blobs),
            procedures: ProcedureService::new(db.clone()),
            teams: TeamService::new(db),
            cfg,
        }
    }
}

/// The full application: public routes, gated resource routes, docs.
pub fn build_app(state: AppState) -> Router {
    routes::router(state)
}
