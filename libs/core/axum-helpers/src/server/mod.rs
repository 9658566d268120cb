//! Server infrastructure module.
//!
//! This module provides:
//! - Application setup with OpenAPI documentation
//! - Health and readiness endpoints
//! - Graceful shutdown coordination
//! - Database connection cleanup
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router, RouterConfig};
//! use core_config::{server::ServerConfig, app_info};
//!
//! // Create router with API documentation and the unprefixed health endpoint
//! let app = create_router(
//!     api_routes,
//!     health_router(app_info!()),
//!     ApiDoc::openapi(),
//!     &RouterConfig::default(),
//! )?;
//!
//! // Start server with graceful shutdown
//! create_production_app(app, &ServerConfig::default(), Duration::from_secs(30), async {}).await?;
//! ```

pub mod app;
pub mod cleanup;
pub mod health;
pub mod shutdown;

// Re-export commonly used types and functions
pub use app::{RouterConfig, create_production_app, create_router};
pub use cleanup::{CleanupCoordinator, close_database};
pub use health::{HealthCheckFuture, HealthResponse, health_router, run_health_checks};
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
