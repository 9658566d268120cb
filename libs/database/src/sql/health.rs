use sea_orm::DatabaseConnection;
use tracing::debug;

use crate::common::DatabaseError;

/// Check database health
///
/// Pings the pool (acquires a connection and runs the backend's liveness query).
/// Used by the `/ready` endpoint.
///
/// # Returns
/// * `Ok(())` if the database is healthy
/// * `Err(DatabaseError)` if the health check fails
pub async fn check_health(db: &DatabaseConnection) -> Result<(), DatabaseError> {
    debug!("Running database health check");

    db.ping()
        .await
        .map_err(|e| DatabaseError::HealthCheckFailed(format!("database ping failed: {}", e)))?;

    debug!("Database health check passed");
    Ok(())
}
