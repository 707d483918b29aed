use api_shared::{AuthMode, Authenticator, ClientRegistry, Credentials};
use clap::{Parser, Subcommand};
use mission_core::models::Patient;
use mission_core::repositories::PatientService;
use mission_core::{CoreConfig, Database, SharedDatabase};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "mission")]
#[command(about = "Mission records administration CLI")]
struct Cli {
    /// SQLite database file (overrides MISSION_DATABASE_PATH)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    Migrate,
    /// Patient records
    Patients {
        #[command(subcommand)]
        command: PatientCommands,
    },
    /// API client credentials
    Clients {
        #[command(subcommand)]
        command: ClientCommands,
    },
}

#[derive(Subcommand)]
enum PatientCommands {
    /// List active patients
    List,
    /// Find active patients whose name contains the query
    Search { query: String },
    /// Soft-delete a patient and all of its cases
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum ClientCommands {
    /// Check a token against the client registry
    Verify {
        client: String,
        token: String,
        /// Environment to check (defaults to MISSION_ENV)
        #[arg(long)]
        env: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("audit=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let cfg = CoreConfig::from_values(
        cli.database
            .map(|p| p.display().to_string())
            .or_else(|| std::env::var("MISSION_DATABASE_PATH").ok()),
        std::env::var("MISSION_ATTACHMENTS_DIR").ok(),
        std::env::var("MISSION_CLIENTS_FILE").ok(),
        std::env::var("MISSION_ENV").ok(),
        std::env::var("MISSION_API_PRODUCT").ok(),
    )?;

    match cli.command {
        Commands::Migrate => {
            Database::open(cfg.database_path())?;
            println!("Schema up to date: {}", cfg.database_path().display());
        }
        Commands::Patients { command } => {
            let service = PatientService::new(SharedDatabase::new(Database::open(
                cfg.database_path(),
            )?));
            match command {
                PatientCommands::List => {
                    let patients: Vec<Patient> = service
                        .list(false)?
                        .into_iter()
                        .map(|detail| detail.patient)
                        .collect();
                    print_patients(&patients);
                }
                PatientCommands::Search { query } => {
                    print_patients(&service.search(Some(&query))?);
                }
                PatientCommands::Delete { id } => {
                    service.delete(id)?;
                    println!("Patient {id} deleted");
                }
            }
        }
        Commands::Clients {
            command: ClientCommands::Verify { client, token, env },
        } => {
            let registry = ClientRegistry::from_path(cfg.clients_file())?;
            let environment = env.unwrap_or_else(|| cfg.environment().to_string());
            let authenticator = Authenticator::new(Arc::new(registry), environment.clone());
            let credentials = Credentials {
                token,
                client_id: Some(client.clone()),
            };
            match authenticator.verify(&credentials, AuthMode::NamedClient) {
                Ok(_) => println!("Valid token for {client} in {environment}"),
                Err(e) => {
                    eprintln!("{e} ({client} in {environment})");
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

fn print_patients(patients: &[Patient]) {
    if patients.is_empty() {
        println!("No patients found.");
        return;
    }
    for patient in patients {
        println!(
            "ID: {}, Name: {}, Birth: {}, Created: {}",
            patient.id,
            patient.name,
            patient
                .birth
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".into()),
            patient.created_at.to_rfc3339()
        );
    }
}
