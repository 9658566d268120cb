//! Shared application state.
//!
//! Built once at startup and cloned into handlers (cheap Arc clones).

use database::sql::DatabaseConnection;

#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// Connection pool, migrated before the state is built
    pub db: DatabaseConnection,
}
