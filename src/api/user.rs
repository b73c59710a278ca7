use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use sqlx::PgPool;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::db::models::user::{NewUser, UpdateUser, User};
use crate::db::queries::user::UserStore;
use crate::error::StoreError;
use crate::utils::api_response::ApiResponse;
use crate::utils::pagination::Pagination;

pub fn user_routes() -> Router<PgPool> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}", put(update_user))
        .route("/users/{id}", delete(delete_user))
        .route("/users/corporate/{corporate_id}", get(get_user_by_corporate_id))
        .route("/users/github/{username}", get(get_user_by_github_username))
}

#[utoipa::path(
    post,
    path = "/users",
    request_body = NewUser,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 409, description = "Corporate id or github username already taken"),
        (status = 503, description = "Store unavailable")
    ),
    tag = "Users"
)]
pub async fn create_user(
    State(pool): State<PgPool>,
    Json(payload): Json<NewUser>,
) -> Result<ApiResponse<User>, StoreError> {
    let user = UserStore::new(pool).create(payload).await?;
    Ok(ApiResponse::success(StatusCode::CREATED, "User created", user))
}

#[utoipa::path(
    get,
    path = "/users",
    params(Pagination),
    responses(
        (status = 200, description = "Users, newest first", body = [User]),
        (status = 503, description = "Store unavailable")
    ),
    tag = "Users"
)]
pub async fn list_users(
    State(pool): State<PgPool>,
    Query(pagination): Query<Pagination>,
) -> Result<ApiResponse<Vec<User>>, StoreError> {
    let (limit, offset) = pagination.limit_offset();
    let users = UserStore::new(pool).list(limit, offset).await?;
    Ok(ApiResponse::success(StatusCode::OK, "Users retrieved", users))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User retrieved", body = User),
        (status = 404, description = "User not found")
    ),
    tag = "Users"
)]
pub async fn get_user(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<User>, StoreError> {
    let user = UserStore::new(pool).get(id).await?;
    Ok(ApiResponse::success(StatusCode::OK, "User retrieved", user))
}

#[utoipa::path(
    get,
    path = "/users/corporate/{corporate_id}",
    params(("corporate_id" = String, Path, description = "Corporate identity")),
    responses(
        (status = 200, description = "User retrieved", body = User),
        (status = 404, description = "User not found")
    ),
    tag = "Users"
)]
pub async fn get_user_by_corporate_id(
    State(pool): State<PgPool>,
    Path(corporate_id): Path<String>,
) -> Result<ApiResponse<User>, StoreError> {
    let user = UserStore::new(pool)
        .get_by_corporate_id(&corporate_id)
        .await?;
    Ok(ApiResponse::success(StatusCode::OK, "User retrieved", user))
}

#[utoipa::path(
    get,
    path = "/users/github/{username}",
    params(("username" = String, Path, description = "Linked github username")),
    responses(
        (status = 200, description = "User retrieved", body = User),
        (status = 404, description = "User not found")
    ),
    tag = "Users"
)]
pub async fn get_user_by_github_username(
    State(pool): State<PgPool>,
    Path(username): Path<String>,
) -> Result<ApiResponse<User>, StoreError> {
    let user = UserStore::new(pool)
        .get_by_github_username(&username)
        .await?;
    Ok(ApiResponse::success(StatusCode::OK, "User retrieved", user))
}

#[utoipa::path(
    put,
    path = "/users/{id}",
    request_body = UpdateUser,
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 404, description = "User not found")
    ),
    tag = "Users"
)]
pub async fn update_user(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUser>,
) -> Result<ApiResponse<User>, StoreError> {
    let user = UserStore::new(pool).update(id, payload).await?;
    Ok(ApiResponse::success(StatusCode::OK, "User updated", user))
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted (idempotent)"),
        (status = 503, description = "Store unavailable")
    ),
    tag = "Users"
)]
pub async fn delete_user(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>, StoreError> {
    UserStore::new(pool).delete(id).await?;
    Ok(ApiResponse::success(StatusCode::OK, "User deleted", ()))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create_user,
        list_users,
        get_user,
        get_user_by_corporate_id,
        get_user_by_github_username,
        update_user,
        delete_user,
    ),
    components(schemas(User, NewUser, UpdateUser)),
    tags(
        (name = "Users", description = "Identity records and alternate-key lookups")
    )
)]
pub struct UserDoc;
