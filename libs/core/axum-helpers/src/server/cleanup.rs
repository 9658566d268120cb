//! Database connection cleanup utilities.
//!
//! Helpers for closing connections during graceful shutdown.

use tracing::{error, info};

/// Closes a SeaORM connection pool.
///
/// The pool also closes on drop; closing explicitly gives a log line and
/// waits for in-flight connections to be released.
///
/// # Example
/// ```ignore
/// use axum_helpers::server::close_database;
///
/// close_database(db, "main").await;
/// ```
pub async fn close_database(db: sea_orm::DatabaseConnection, name: &str) {
    match db.close().await {
        Ok(_) => info!("Database connection '{}' closed successfully", name),
        Err(e) => error!("Error closing database connection '{}': {}", name, e),
    }
}

/// Generic cleanup coordinator for multiple connections.
///
/// Tasks are spawned as they are added; `run` waits for all of them.
///
/// # Example
/// ```ignore
/// use axum_helpers::server::{close_database, CleanupCoordinator};
///
/// let mut cleanup = CleanupCoordinator::new();
/// cleanup.add_task("database", close_database(db, "main"));
/// cleanup.run().await;
/// ```
pub struct CleanupCoordinator {
    tasks: Vec<(&'static str, tokio::task::JoinHandle<()>)>,
}

impl CleanupCoordinator {
    /// Create a new cleanup coordinator.
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Add a cleanup task with a name.
    ///
    /// The task will be spawned immediately and tracked for completion.
    pub fn add_task<F>(&mut self, name: &'static str, task: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(task);
        self.tasks.push((name, handle));
    }

    /// Wait for all cleanup tasks.
    ///
    /// A task that panics is logged and does not stop the others.
    pub async fn run(self) {
        info!("Running {} cleanup tasks", self.tasks.len());

        for (name, handle) in self.tasks {
            match handle.await {
                Ok(_) => {
                    info!("Cleanup task '{}' completed successfully", name);
                }
                Err(e) => {
                    error!("Cleanup task '{}' failed: {}", name, e);
                }
            }
        }

        info!("All cleanup tasks completed");
    }
}

impl Default for CleanupCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
