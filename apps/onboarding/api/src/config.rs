use axum_helpers::RouterConfig;
use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_bool, env_or_default, env_parse};
use core_config::server::ServerConfig;
use database::sql::SqlConfig;

// Re-export Environment for use in other modules
pub use core_config::Environment;

const DEFAULT_PROJECT_NAME: &str = "Onboarding API";

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub debug: bool,
    pub server: ServerConfig,
    pub router: RouterConfig,
    pub database: SqlConfig,
    /// OpenAPI title
    pub project_name: String,
    pub shutdown_timeout_secs: u64,
}

impl FromEnv for Config {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            app: app_info!(),
            environment: Environment::from_env(),
            debug: env_bool("DEBUG", false)?,
            server: ServerConfig::from_env()?, // HOST=0.0.0.0, PORT=8000
            router: RouterConfig::from_env()?,
            database: SqlConfig::from_env()?,
            project_name: env_or_default("PROJECT_NAME", DEFAULT_PROJECT_NAME),
            shutdown_timeout_secs: env_parse("SHUTDOWN_TIMEOUT_SECS", "30")?,
        })
    }
}
