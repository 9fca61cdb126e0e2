//! Submission intake server.
//!
//! Main entry point for the contact submission service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use intake_api::{AppState, create_router};
use intake_core::intake::IntakeService;
use intake_core::storage::FileStore;
use intake_db::{SubmissionRepository, connect};
use intake_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "intake=debug,intake_api=debug,intake_core=debug,intake_db=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;

    let db = connect(&config.database).await?;
    info!("Connected to database");

    let intake_config = Arc::new(config.intake);
    let store = FileStore::from_config(&intake_config)?;
    info!(
        upload_root = %store.root().display(),
        max_files = intake_config.max_files,
        max_file_size = intake_config.max_file_size,
        "File store configured"
    );

    let intake = IntakeService::new(
        Arc::clone(&intake_config),
        Arc::new(store),
        Arc::new(SubmissionRepository::new(db)),
    );

    let state = AppState {
        intake: Arc::new(intake),
        config: intake_config,
    };

    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
