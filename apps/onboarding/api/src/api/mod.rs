use axum::{Router, routing::get};
use axum_helpers::server::{create_router, health_router};

use crate::state::AppState;

pub mod health;
pub mod users;

/// Creates the API routes without the prefix.
/// The prefix is added by the `create_router` helper.
pub fn routes(state: &AppState) -> Router {
    Router::new().merge(users::router(state))
}

/// Creates a router with the /ready endpoint that checks the database.
///
/// State is applied here so it merges into the stateless root routes.
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}

/// Unprefixed service routes: `/`, `/ping`, `/health` and `/ready`.
pub fn root_routes(state: &AppState) -> Router {
    Router::new()
        .route("/", get(health::root))
        .route("/ping", get(health::ping))
        .merge(health_router(state.config.app))
        .merge(ready_router(state.clone()))
}

/// Full application: prefixed API with docs plus the service routes, all
/// behind the shared middleware stack.
pub fn app(state: &AppState) -> std::io::Result<Router> {
    let openapi = crate::openapi::openapi(&state.config.project_name);
    create_router(routes(state), root_routes(state), openapi, &state.config.router)
}
