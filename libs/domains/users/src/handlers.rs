use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    ValidatedJson,
    errors::responses::{
        ConflictResponse, InternalServerErrorResponse, NotFoundResponse, ValidationErrorResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::entity;
use crate::error::UserResult;
use crate::models::{CreateUser, Gender, UpdateUser, User, UserQuery};
use crate::repository::UserRepository;
use crate::service::UserService;

/// OpenAPI documentation for Users API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_users,
        create_user,
        onboard_user,
        get_user,
        update_user,
        delete_user,
    ),
    components(
        schemas(User, CreateUser, UpdateUser, UserQuery, Gender),
        responses(
            NotFoundResponse,
            ValidationErrorResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = entity::Model::TAG, description = "User onboarding endpoints")
    )
)]
pub struct ApiDoc;

/// Create the users router, mounted at `/users`
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/", get(list_users).post(create_user))
        .route("/users/onboarding", post(onboard_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .with_state(shared_service)
}

/// List users in creation order
#[utoipa::path(
    get,
    path = "/users/",
    tag = entity::Model::TAG,
    params(UserQuery),
    responses(
        (status = 200, description = "List of users", body = Vec<User>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Query(query): Query<UserQuery>,
) -> UserResult<Json<Vec<User>>> {
    let users = service.list_users(query).await?;
    Ok(Json(users))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/users/",
    tag = entity::Model::TAG,
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created successfully", body = User),
        (status = 400, response = ConflictResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> UserResult<impl IntoResponse> {
    let user = service.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Onboard a user: creates a new user or updates the profile of an existing nickname
#[utoipa::path(
    post,
    path = "/users/onboarding",
    tag = entity::Model::TAG,
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created or updated", body = User),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn onboard_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> UserResult<impl IntoResponse> {
    let user = service.onboard_user(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = entity::Model::TAG,
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<String>,
) -> UserResult<Json<User>> {
    let user = service.get_user(&id).await?;
    Ok(Json(user))
}

/// Update a user; only the fields present in the body change
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = entity::Model::TAG,
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated successfully", body = User),
        (status = 400, response = ConflictResponse),
        (status = 404, response = NotFoundResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateUser>,
) -> UserResult<Json<User>> {
    let user = service.update_user(&id, input).await?;
    Ok(Json(user))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = entity::Model::TAG,
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted successfully"),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<String>,
) -> UserResult<StatusCode> {
    service.delete_user(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
