use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, build_app};
use api_shared::ClientRegistry;
use mission_core::{CoreConfig, Database, SharedDatabase};
use mission_files::{BlobStore, FilesService};

/// Main entry point for the mission API server
///
/// Resolves configuration once, opens the store, loads the client registry and serves the REST
/// API until interrupted.
///
/// # Environment Variables
/// - `MISSION_REST_ADDR`: server address (default: "0.0.0.0:3000")
/// - `MISSION_DATABASE_PATH`: SQLite database file
/// - `MISSION_ATTACHMENTS_DIR`: root of the attachment blob store
/// - `MISSION_CLIENTS_FILE`: YAML client registry
/// - `MISSION_ENV`: runtime environment used for token lookup
/// - `MISSION_API_PRODUCT`: product name in vendor media types
///
/// # Errors
/// Returns an error if:
/// - configuration is invalid,
/// - the database, blob store or client registry cannot be opened, or
/// - the server address cannot be bound.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mission_run=info".parse()?)
                .add_directive("mission_core=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("audit=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = Arc::new(CoreConfig::from_values(
        std::env::var("MISSION_DATABASE_PATH").ok(),
        std::env::var("MISSION_ATTACHMENTS_DIR").ok(),
        std::env::var("MISSION_CLIENTS_FILE").ok(),
        std::env::var("MISSION_ENV").ok(),
        std::env::var("MISSION_API_PRODUCT").ok(),
    )?);
    let addr = std::env::var("MISSION_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    std::fs::create_dir_all(cfg.attachments_dir())?;
    let blobs: Arc<dyn BlobStore> = Arc::new(FilesService::new(cfg.attachments_dir())?);
    let db = SharedDatabase::new(Database::open(cfg.database_path())?);

    let registry = ClientRegistry::from_path(cfg.clients_file())?;
    if registry.clients_in(cfg.environment()).next().is_none() {
        tracing::warn!(
            environment = cfg.environment(),
            "no client holds a token for this environment; every request will be rejected"
        );
    }

    let app = build_app(AppState::new(cfg.clone(), db, blobs, Arc::new(registry)));

    tracing::info!(
        "++ Starting mission REST API on {} (environment {})",
        addr,
        cfg.environment()
    );
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("-- Shutting down");
    }
}
