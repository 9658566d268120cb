use axum_helpers::server::{CleanupCoordinator, close_database, create_production_app};
use core_config::FromEnv;
use core_config::tracing::{init_tracing, install_color_eyre};
use database::sql;
use migration::Migrator;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // .env is optional; real environment variables win
    dotenvy::dotenv().ok();

    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment, config.debug);

    info!("Connecting to database at {}", config.database.redacted_url());
    let db = sql::connect_from_config(config.database.clone())
        .await
        .map_err(|e| eyre::eyre!("Database connection failed: {}", e))?;

    sql::run_migrations::<Migrator>(&db, config.app.name).await?;

    let state = AppState { config, db };

    // - {prefix}/users: user onboarding API, docs at /swagger-ui
    // - /, /ping, /health: liveness
    // - /ready: readiness with a database check
    let app = api::app(&state)?;

    let shutdown_timeout = Duration::from_secs(state.config.shutdown_timeout_secs);
    info!(
        "Starting {} with graceful shutdown ({:?} timeout)",
        state.config.project_name, shutdown_timeout
    );

    let server_config = state.config.server.clone();
    create_production_app(app, &server_config, shutdown_timeout, async move {
        let mut cleanup = CleanupCoordinator::new();
        cleanup.add_task("database", close_database(state.db, "main"));
        cleanup.run().await;
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Onboarding API shutdown complete");
    Ok(())
}
