use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use modkit::api::Problem;
use utoipa::OpenApi;

use crate::api::rest::{dto, handlers};
use crate::domain::service::Service;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_users,
        handlers::get_user,
        handlers::create_user,
        handlers::update_points,
        handlers::delete_user,
        handlers::delete_all,
    ),
    components(schemas(dto::UserDto, dto::CreateUserReq, dto::UpdatePointsReq, Problem)),
    tags((name = "Users", description = "Users, their points and their rank"))
)]
pub struct LeaderboardOpenApi;

pub fn register_routes(
    router: Router,
    openapi: &mut utoipa::openapi::OpenApi,
    service: Arc<Service>,
) -> anyhow::Result<Router> {
    openapi.merge(LeaderboardOpenApi::openapi());

    let users = Router::new()
        .route(
            "/api/user",
            get(handlers::list_users)
                .post(handlers::create_user)
                .delete(handlers::delete_all),
        )
        .route(
            "/api/user/{id}",
            get(handlers::get_user)
                .put(handlers::update_points)
                .delete(handlers::delete_user),
        )
        .layer(Extension(service));

    Ok(router.merge(users))
}
