/// Unified database error type for connection, migration and health operations
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Errors reported by SeaORM / sqlx
    #[error("Database error: {0}")]
    Sql(#[from] sea_orm::DbErr),

    /// Health check failed
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    /// Migration error
    #[error("Migration error for {app}: {source}")]
    MigrationError {
        app: String,
        #[source]
        source: sea_orm::DbErr,
    },
}

/// Result type alias for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;
