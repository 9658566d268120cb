use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use super::SqlConfig;
use crate::common::{DatabaseError, DatabaseResult};

/// Connect using default pool settings
///
/// # Example
/// ```ignore
/// use database::sql::connect;
///
/// let db = connect("sqlite://onboarding.db?mode=rwc").await?;
/// ```
pub async fn connect(database_url: &str) -> DatabaseResult<DatabaseConnection> {
    connect_from_config(SqlConfig::new(database_url)).await
}

/// Connect using a SqlConfig
///
/// This is the recommended way to connect when using configuration.
pub async fn connect_from_config(config: SqlConfig) -> DatabaseResult<DatabaseConnection> {
    let options: ConnectOptions = config.into_connect_options();
    let db = Database::connect(options).await?;

    info!(
        backend = ?db.get_database_backend(),
        "Successfully connected to database"
    );

    Ok(db)
}

/// Run database migrations using the provided Migrator
///
/// # Arguments
/// * `db` - Database connection
/// * `app_name` - Name of the app for logging (e.g., "onboarding_api")
pub async fn run_migrations<M: MigratorTrait>(
    db: &DatabaseConnection,
    app_name: &str,
) -> DatabaseResult<()> {
    info!("Running {} database migrations...", app_name);
    M::up(db, None)
        .await
        .map_err(|source| DatabaseError::MigrationError {
            app: app_name.to_string(),
            source,
        })?;
    info!("Migrations completed successfully for {}", app_name);
    Ok(())
}
