//! SeaORM connector and utilities for SQLite and PostgreSQL
//!
//! Provides connection management, migration running, and health checks.

mod config;
mod connector;
mod health;

pub use config::{DEFAULT_DATABASE_URL, SqlConfig};
pub use connector::{connect, connect_from_config, run_migrations};
pub use health::check_health;

// Re-export SeaORM types for convenience
pub use sea_orm::{ConnectOptions, DatabaseConnection, DbErr};
pub use sea_orm_migration::MigratorTrait;
