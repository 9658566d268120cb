//! Relational database access for the onboarding service.
//!
//! Wraps SeaORM connection setup, migrations, and health checks so that the
//! binary performs them in one explicit startup routine and hands the resulting
//! [`DatabaseConnection`](sql::DatabaseConnection) to the domain layer.
//!
//! Both SQLite (the default, `sqlite://onboarding.db?mode=rwc`) and PostgreSQL
//! URLs are accepted; the backend is picked from the URL scheme.
//!
//! # Example
//!
//! ```ignore
//! use database::sql::{self, SqlConfig};
//! use migration::Migrator;
//!
//! let db = sql::connect_from_config(SqlConfig::new("sqlite::memory:")).await?;
//! sql::run_migrations::<Migrator>(&db, "onboarding_api").await?;
//! ```

pub mod common;
pub mod sql;

pub use common::{DatabaseError, DatabaseResult};
