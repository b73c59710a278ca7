use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use sqlx::PgPool;
use utoipa::{IntoParams, OpenApi};
use uuid::Uuid;

use crate::db::models::project::{
    ApprovedProject, ContributorGrant, NewApprovedProject, NewProject, Project,
    ProjectContributor, UpdateProject,
};
use crate::db::queries::project::ProjectStore;
use crate::error::StoreError;
use crate::utils::api_response::ApiResponse;
use crate::utils::pagination::Pagination;

pub fn project_routes() -> Router<PgPool> {
    Router::new()
        .route("/projects", post(create_project))
        .route("/projects", get(list_projects))
        .route("/projects/search", get(search_projects))
        .route("/projects/{id}", get(get_project))
        .route("/projects/{id}", put(update_project))
        .route("/projects/{id}", delete(delete_project))
        .route("/projects/{id}/contributors", get(list_contributors))
        .route("/projects/{id}/contributors/{user_id}", put(add_contributor))
        .route("/projects/{id}/contributors/{user_id}", delete(remove_contributor))
        .route("/users/{id}/projects", get(get_owned_projects))
        .route("/users/{id}/contributions", get(get_contributed_projects))
        .route("/users/{id}/approved-projects", get(get_approved_projects_for_user))
        .route("/approved-projects", post(create_approved_project))
        .route("/approved-projects", get(list_approved_projects))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Substring matched case-insensitively against name and description.
    pub q: String,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[utoipa::path(
    post,
    path = "/projects",
    request_body = NewProject,
    responses(
        (status = 201, description = "Project created", body = Project),
        (status = 503, description = "Store unavailable")
    ),
    tag = "Projects"
)]
pub async fn create_project(
    State(pool): State<PgPool>,
    Json(payload): Json<NewProject>,
) -> Result<ApiResponse<Project>, StoreError> {
    let project = ProjectStore::new(pool).create(payload).await?;
    Ok(ApiResponse::success(StatusCode::CREATED, "Project created", project))
}

#[utoipa::path(
    get,
    path = "/projects",
    params(Pagination),
    responses(
        (status = 200, description = "Projects, newest first", body = [Project]),
        (status = 503, description = "Store unavailable")
    ),
    tag = "Projects"
)]
pub async fn list_projects(
    State(pool): State<PgPool>,
    Query(pagination): Query<Pagination>,
) -> Result<ApiResponse<Vec<Project>>, StoreError> {
    let (limit, offset) = pagination.limit_offset();
    let projects = ProjectStore::new(pool).list(limit, offset).await?;
    Ok(ApiResponse::success(StatusCode::OK, "Projects retrieved", projects))
}

#[utoipa::path(
    get,
    path = "/projects/{id}",
    params(("id" = Uuid, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project retrieved", body = Project),
        (status = 404, description = "Project not found")
    ),
    tag = "Projects"
)]
pub async fn get_project(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Project>, StoreError> {
    let project = ProjectStore::new(pool).get(id).await?;
    Ok(ApiResponse::success(StatusCode::OK, "Project retrieved", project))
}

#[utoipa::path(
    put,
    path = "/projects/{id}",
    request_body = UpdateProject,
    params(("id" = Uuid, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project updated", body = Project),
        (status = 404, description = "Project not found")
    ),
    tag = "Projects"
)]
pub async fn update_project(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProject>,
) -> Result<ApiResponse<Project>, StoreError> {
    let project = ProjectStore::new(pool).update(id, payload).await?;
    Ok(ApiResponse::success(StatusCode::OK, "Project updated", project))
}

#[utoipa::path(
    delete,
    path = "/projects/{id}",
    params(("id" = Uuid, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project deleted (idempotent)"),
        (status = 503, description = "Store unavailable")
    ),
    tag = "Projects"
)]
pub async fn delete_project(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>, StoreError> {
    ProjectStore::new(pool).delete(id).await?;
    Ok(ApiResponse::success(StatusCode::OK, "Project deleted", ()))
}

#[utoipa::path(
    get,
    path = "/projects/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Public projects matching the search text", body = [Project]),
        (status = 503, description = "Store unavailable")
    ),
    tag = "Projects"
)]
pub async fn search_projects(
    State(pool): State<PgPool>,
    Query(params): Query<SearchParams>,
) -> Result<ApiResponse<Vec<Project>>, StoreError> {
    let pagination = Pagination {
        page: params.page,
        limit: params.limit,
    };
    let (limit, offset) = pagination.limit_offset();
    let projects = ProjectStore::new(pool)
        .search(&params.q, limit, offset)
        .await?;
    Ok(ApiResponse::success(StatusCode::OK, "Projects retrieved", projects))
}

#[utoipa::path(
    get,
    path = "/users/{id}/projects",
    params(("id" = Uuid, Path, description = "Owner id"), Pagination),
    responses(
        (status = 200, description = "Projects owned by the user", body = [Project]),
        (status = 503, description = "Store unavailable")
    ),
    tag = "Projects"
)]
pub async fn get_owned_projects(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
    Query(pagination): Query<Pagination>,
) -> Result<ApiResponse<Vec<Project>>, StoreError> {
    let (limit, offset) = pagination.limit_offset();
    let projects = ProjectStore::new(pool).by_owner(id, limit, offset).await?;
    Ok(ApiResponse::success(StatusCode::OK, "Projects retrieved", projects))
}

#[utoipa::path(
    get,
    path = "/users/{id}/contributions",
    params(("id" = Uuid, Path, description = "User id"), Pagination),
    responses(
        (status = 200, description = "Projects the user contributes to", body = [Project]),
        (status = 503, description = "Store unavailable")
    ),
    tag = "Projects"
)]
pub async fn get_contributed_projects(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
    Query(pagination): Query<Pagination>,
) -> Result<ApiResponse<Vec<Project>>, StoreError> {
    let (limit, offset) = pagination.limit_offset();
    let projects = ProjectStore::new(pool)
        .by_contributor(id, limit, offset)
        .await?;
    Ok(ApiResponse::success(StatusCode::OK, "Projects retrieved", projects))
}

#[utoipa::path(
    get,
    path = "/users/{id}/approved-projects",
    params(("id" = Uuid, Path, description = "Requester id"), Pagination),
    responses(
        (status = 200, description = "Projects linked to the user's approved requests", body = [Project]),
        (status = 503, description = "Store unavailable")
    ),
    tag = "Projects"
)]
pub async fn get_approved_projects_for_user(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
    Query(pagination): Query<Pagination>,
) -> Result<ApiResponse<Vec<Project>>, StoreError> {
    let (limit, offset) = pagination.limit_offset();
    let projects = ProjectStore::new(pool)
        .approved_for_user(id, limit, offset)
        .await?;
    Ok(ApiResponse::success(StatusCode::OK, "Projects retrieved", projects))
}

#[utoipa::path(
    put,
    path = "/projects/{id}/contributors/{user_id}",
    request_body = ContributorGrant,
    params(
        ("id" = Uuid, Path, description = "Project id"),
        ("user_id" = Uuid, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "Contributor added or role/permissions replaced"),
        (status = 503, description = "Store unavailable")
    ),
    tag = "Projects"
)]
pub async fn add_contributor(
    State(pool): State<PgPool>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
    Json(grant): Json<ContributorGrant>,
) -> Result<ApiResponse<()>, StoreError> {
    ProjectStore::new(pool)
        .add_contributor(id, user_id, grant)
        .await?;
    Ok(ApiResponse::success(StatusCode::OK, "Contributor added", ()))
}

#[utoipa::path(
    delete,
    path = "/projects/{id}/contributors/{user_id}",
    params(
        ("id" = Uuid, Path, description = "Project id"),
        ("user_id" = Uuid, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "Contributor removed (idempotent)"),
        (status = 503, description = "Store unavailable")
    ),
    tag = "Projects"
)]
pub async fn remove_contributor(
    State(pool): State<PgPool>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<ApiResponse<()>, StoreError> {
    ProjectStore::new(pool).remove_contributor(id, user_id).await?;
    Ok(ApiResponse::success(StatusCode::OK, "Contributor removed", ()))
}

#[utoipa::path(
    get,
    path = "/projects/{id}/contributors",
    params(("id" = Uuid, Path, description = "Project id")),
    responses(
        (status = 200, description = "Contributors with user display fields, earliest first", body = [ProjectContributor]),
        (status = 503, description = "Store unavailable")
    ),
    tag = "Projects"
)]
pub async fn list_contributors(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Vec<ProjectContributor>>, StoreError> {
    let contributors = ProjectStore::new(pool).contributors(id).await?;
    Ok(ApiResponse::success(StatusCode::OK, "Contributors retrieved", contributors))
}

#[utoipa::path(
    post,
    path = "/approved-projects",
    request_body = NewApprovedProject,
    responses(
        (status = 201, description = "Approved project created", body = ApprovedProject),
        (status = 503, description = "Store unavailable")
    ),
    tag = "Projects"
)]
pub async fn create_approved_project(
    State(pool): State<PgPool>,
    Json(payload): Json<NewApprovedProject>,
) -> Result<ApiResponse<ApprovedProject>, StoreError> {
    let project = ProjectStore::new(pool).create_approved_project(payload).await?;
    Ok(ApiResponse::success(
        StatusCode::CREATED,
        "Approved project created",
        project,
    ))
}

#[utoipa::path(
    get,
    path = "/approved-projects",
    params(Pagination),
    responses(
        (status = 200, description = "Active approved projects, latest approval first", body = [ApprovedProject]),
        (status = 503, description = "Store unavailable")
    ),
    tag = "Projects"
)]
pub async fn list_approved_projects(
    State(pool): State<PgPool>,
    Query(pagination): Query<Pagination>,
) -> Result<ApiResponse<Vec<ApprovedProject>>, StoreError> {
    let (limit, offset) = pagination.limit_offset();
    let projects = ProjectStore::new(pool)
        .list_approved_projects(limit, offset)
        .await?;
    Ok(ApiResponse::success(StatusCode::OK, "Approved projects retrieved", projects))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create_project,
        list_projects,
        get_project,
        update_project,
        delete_project,
        search_projects,
        get_owned_projects,
        get_contributed_projects,
        get_approved_projects_for_user,
        add_contributor,
        remove_contributor,
        list_contributors,
        create_approved_project,
        list_approved_projects,
    ),
    components(schemas(
        Project,
        NewProject,
        UpdateProject,
        ApprovedProject,
        NewApprovedProject,
        ProjectContributor,
        ContributorGrant
    )),
    tags(
        (name = "Projects", description = "Project catalog and contributor membership")
    )
)]
pub struct ProjectDoc;
