//! SQLite test infrastructure
//!
//! Provides a `TestDatabase` helper backed by an in-memory SQLite database
//! with the workspace migrations applied.

use database::sql::{SqlConfig, connect_from_config, run_migrations};
use migration::Migrator;
use sea_orm::DatabaseConnection;

/// Test database wrapper
///
/// Each instance owns a private in-memory database; it disappears when the
/// last clone of the connection is dropped.
pub struct TestDatabase {
    pub connection: DatabaseConnection,
}

impl TestDatabase {
    /// Create a new test database with migrations applied
    ///
    /// # Example
    ///
    /// ```no_run
    /// use test_utils::TestDatabase;
    ///
    /// # async fn example() {
    /// let db = TestDatabase::new().await;
    /// // Use db.connection() to create your repository
    /// # }
    /// ```
    pub async fn new() -> Self {
        let connection = connect_from_config(SqlConfig::new("sqlite::memory:"))
            .await
            .expect("Failed to connect to test database");

        run_migrations::<Migrator>(&connection, "test")
            .await
            .expect("Failed to run migrations");

        tracing::info!("Test database ready (in-memory SQLite)");

        Self { connection }
    }

    /// Get a clone of the database connection
    pub fn connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }
}
