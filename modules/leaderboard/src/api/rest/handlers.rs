use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path,
    },
    response::{Json, Response},
    Extension,
};
use modkit::api::{response, ApiResult, Problem};
use tracing::{debug, info};

use crate::api::rest::dto::{CreateUserReq, UpdatePointsReq, UserDto};
use crate::contract::model::NewUser;
use crate::domain::error::DomainError;
use crate::domain::service::Service;

/// List all users ordered by rank
#[utoipa::path(
    get,
    path = "/api/user",
    tag = "Users",
    responses(
        (status = 200, description = "Users ordered by rank, best first", body = [UserDto]),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn list_users(
    Extension(svc): Extension<Arc<Service>>,
) -> ApiResult<Json<Vec<UserDto>>, DomainError> {
    debug!("Listing users");
    let users = svc.list_ranked().await?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

/// Get a specific user by ID with its current rank
#[utoipa::path(
    get,
    path = "/api/user/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserDto),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn get_user(
    Extension(svc): Extension<Arc<Service>>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<UserDto>, DomainError> {
    let Path(id) = path?;
    debug!("Getting user with id: {}", id);
    let user = svc.get_ranked(id).await?;
    Ok(Json(UserDto::from(user)))
}

/// Create a new user with zero points
#[utoipa::path(
    post,
    path = "/api/user",
    tag = "Users",
    request_body = CreateUserReq,
    responses(
        (status = 201, description = "Created user", body = UserDto,
            headers(("Location" = String, description = "URL of the created user"))),
        (status = 400, description = "Invalid or already used displayName", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn create_user(
    Extension(svc): Extension<Arc<Service>>,
    body: Result<Json<CreateUserReq>, JsonRejection>,
) -> ApiResult<Response, DomainError> {
    let Json(req) = body?;
    let Some(display_name) = req.display_name else {
        return Err(DomainError::validation("displayName", "displayName is required.").into());
    };
    info!("Creating user: {}", display_name);

    let user = svc.create_user(NewUser { display_name }).await?;
    let location = format!("/api/user/{}", user.id);
    Ok(response::created_json(&location, UserDto::from(user)))
}

/// Replace the point total of a user
#[utoipa::path(
    put,
    path = "/api/user/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdatePointsReq,
    responses(
        (status = 204, description = "Points updated"),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn update_points(
    Extension(svc): Extension<Arc<Service>>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdatePointsReq>, JsonRejection>,
) -> ApiResult<Response, DomainError> {
    let Path(id) = path?;
    let Json(req) = body?;
    info!("Setting points of user {} to {}", id, req.points);

    svc.update_points(id, req.points).await?;
    Ok(response::no_content())
}

/// Delete a user by ID
#[utoipa::path(
    delete,
    path = "/api/user/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn delete_user(
    Extension(svc): Extension<Arc<Service>>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Response, DomainError> {
    let Path(id) = path?;
    info!("Deleting user: {}", id);

    svc.delete_user(id).await?;
    Ok(response::no_content())
}

/// Delete every user
#[utoipa::path(
    delete,
    path = "/api/user",
    tag = "Users",
    responses(
        (status = 204, description = "All users deleted"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn delete_all(
    Extension(svc): Extension<Arc<Service>>,
) -> ApiResult<Response, DomainError> {
    info!("Deleting all users");

    svc.delete_all().await?;
    Ok(response::no_content())
}
