//! Service-level endpoints outside the API prefix.

use crate::state::AppState;
use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use serde_json::{Value, json};

pub const WELCOME_MESSAGE: &str = "온보딩 API에 오신 것을 환영합니다!";

/// Readiness check: 200 when the database answers, 503 otherwise.
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "database",
        Box::pin(async {
            database::sql::check_health(&state.db)
                .await
                .map_err(|e| e.to_string())
        }),
    )];

    match run_health_checks(checks).await {
        Ok((status, json)) => (status, json).into_response(),
        Err((status, json)) => (status, json).into_response(),
    }
}

pub async fn ping() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn root() -> Json<Value> {
    Json(json!({ "message": WELCOME_MESSAGE }))
}
