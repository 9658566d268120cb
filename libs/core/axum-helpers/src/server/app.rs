use super::shutdown::{ShutdownCoordinator, coordinated_shutdown};
use crate::errors::handlers::{method_not_allowed, not_found};
use crate::http::{cors::cors_layer_from_origins, security::security_headers};
use axum::{Router, middleware};
use core_config::{ConfigError, FromEnv, env_or_default};
use core_config::server::ServerConfig;
use std::io;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::openapi::OpenApi;
use utoipa::openapi::server::Server;
use utoipa_swagger_ui::SwaggerUi;

/// Options for [`create_router`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    /// Prefix the API routes and the OpenAPI document are mounted under
    pub api_prefix: String,
    /// Comma-separated allowed origins; `None` allows any origin
    pub cors_allowed_origins: Option<String>,
}

impl RouterConfig {
    /// The prefix without a trailing slash; empty when routes live at the root.
    pub fn normalized_prefix(&self) -> String {
        let trimmed = self.api_prefix.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{}", trimmed)
        }
    }

    pub fn openapi_path(&self) -> String {
        format!("{}/openapi.json", self.normalized_prefix())
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            api_prefix: "/api".to_string(),
            cors_allowed_origins: None,
        }
    }
}

impl FromEnv for RouterConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_prefix: env_or_default("API_PREFIX", "/api"),
            cors_allowed_origins: std::env::var("CORS_ALLOWED_ORIGIN").ok(),
        })
    }
}

/// Creates a configured Axum router with common middleware and documentation.
///
/// This function sets up:
/// - Swagger UI at `/swagger-ui` reading `{prefix}/openapi.json`
/// - API routes nested under the configured prefix
/// - Unprefixed service routes (`root`) such as `/`, `/health` and `/ready`
/// - Common middleware (tracing, security headers, CORS, compression)
/// - JSON 404 and 405 fallbacks
///
/// The OpenAPI document gets a server entry for the prefix so its paths stay
/// relative to the mounted routes.
///
/// Every route, prefixed or not, goes through the same middleware stack.
///
/// # Errors
/// Returns an error if `cors_allowed_origins` is set but empty or invalid.
///
/// # Example
/// ```ignore
/// let api_routes = Router::new()
///     .merge(domain_users::handlers::router(service));
///
/// let root = health_router(app_info!());
///
/// let router = create_router(api_routes, root, ApiDoc::openapi(), &RouterConfig::default())?;
/// ```
pub fn create_router(
    apis: Router,
    root: Router,
    mut openapi: OpenApi,
    config: &RouterConfig,
) -> io::Result<Router> {
    let prefix = config.normalized_prefix();
    let cors_layer = cors_layer_from_origins(config.cors_allowed_origins.as_deref())?;

    if !prefix.is_empty() {
        openapi.servers = Some(vec![Server::new(prefix.clone())]);
    }

    let api_router = if prefix.is_empty() {
        Router::new().merge(apis)
    } else {
        Router::new().nest(&prefix, apis)
    };

    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url(config.openapi_path(), openapi))
        .merge(api_router)
        .merge(root)
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(cors_layer)
        .layer(CompressionLayer::new());

    Ok(router)
}

/// Production-ready server with coordinated shutdown and cleanup.
///
/// # Arguments
/// * `router` - The configured Axum router
/// * `server_config` - Server configuration
/// * `shutdown_timeout` - Maximum time the cleanup future may run
/// * `cleanup` - Async cleanup, e.g. closing the database pool
///
/// # Example
/// ```ignore
/// let cleanup = async move {
///     close_database(db, "main").await;
/// };
///
/// create_production_app(router, &config, Duration::from_secs(30), cleanup).await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let (coordinator, _rx) = ShutdownCoordinator::new();
    let shutdown_handle = coordinator.clone();

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let cleanup_handle = tokio::spawn(async move {
        shutdown_handle.wait_for_signal().await;

        info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
        match tokio::time::timeout(shutdown_timeout, cleanup).await {
            Ok(_) => info!("Cleanup completed successfully"),
            Err(_) => {
                tracing::warn!(
                    "Cleanup exceeded timeout of {:?}, forcing shutdown",
                    shutdown_timeout
                );
            }
        }
    });

    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(coordinated_shutdown(coordinator))
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        });

    cleanup_handle.await.ok();

    serve_result
}
