use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use serde::Deserialize;
use sqlx::PgPool;
use utoipa::{IntoParams, OpenApi, ToSchema};
use uuid::Uuid;

use crate::db::models::request::{
    Request, RequestComment, RequestStats, RequestStatus, RequestType, UpdateRequest,
};
use crate::db::queries::request::RequestStore;
use crate::error::StoreError;
use crate::lifecycle::{
    RequestLifecycle, SubmitAccessRequest, SubmitContributionPermissionRequest,
    SubmitProjectRequest, SubmitPullRequestApproval,
};
use crate::utils::api_response::ApiResponse;
use crate::utils::pagination::Pagination;

pub fn request_routes() -> Router<PgPool> {
    Router::new()
        .route("/requests/project", post(submit_project_request))
        .route("/requests/pullrequest", post(submit_pull_request_approval))
        .route("/requests/access", post(submit_access_request))
        .route("/requests/contribution-permission", post(submit_contribution_permission))
        .route("/requests", get(list_requests))
        .route("/requests/pending", get(get_pending_requests))
        .route("/requests/types/{type}", get(get_requests_by_type))
        .route("/requests/{id}", get(get_request))
        .route("/requests/{id}", put(update_request))
        .route("/requests/{id}", delete(delete_request))
        .route("/requests/{id}/status", patch(decide_request))
        .route("/requests/{id}/comments", post(add_comment))
        .route("/requests/{id}/comments", get(list_comments))
        .route("/users/{id}/requests", get(get_user_requests))
        .route("/users/{id}/requests/all", get(get_all_user_requests))
        .route("/users/{id}/requests/stats", get(get_user_request_stats))
}

fn lifecycle(pool: PgPool) -> RequestLifecycle {
    RequestLifecycle::new(RequestStore::new(pool))
}

/// Review decision applied to a pending request. `status` must be
/// "approved" or "rejected"; a rejection carries its reason here.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewDecision {
    pub status: String,
    pub reviewer_id: Uuid,
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewComment {
    pub user_id: Uuid,
    pub comment: String,
    #[serde(default)]
    pub is_internal: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RequestFilter {
    /// Optional status filter; absent means every status.
    pub status: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[utoipa::path(
    post,
    path = "/requests/project",
    request_body = SubmitProjectRequest,
    responses(
        (status = 201, description = "Project request submitted as pending", body = Request),
        (status = 400, description = "Missing required field")
    ),
    tag = "Requests"
)]
pub async fn submit_project_request(
    State(pool): State<PgPool>,
    Json(payload): Json<SubmitProjectRequest>,
) -> Result<ApiResponse<Request>, StoreError> {
    let request = lifecycle(pool).submit_project(payload).await?;
    Ok(ApiResponse::success(StatusCode::CREATED, "Project request submitted", request))
}

#[utoipa::path(
    post,
    path = "/requests/pullrequest",
    request_body = SubmitPullRequestApproval,
    responses(
        (status = 201, description = "Pull request approval submitted as pending", body = Request),
        (status = 400, description = "Missing required field")
    ),
    tag = "Requests"
)]
pub async fn submit_pull_request_approval(
    State(pool): State<PgPool>,
    Json(payload): Json<SubmitPullRequestApproval>,
) -> Result<ApiResponse<Request>, StoreError> {
    let request = lifecycle(pool).submit_pull_request(payload).await?;
    Ok(ApiResponse::success(
        StatusCode::CREATED,
        "Pull request approval submitted",
        request,
    ))
}

#[utoipa::path(
    post,
    path = "/requests/access",
    request_body = SubmitAccessRequest,
    responses(
        (status = 201, description = "Access request submitted as pending", body = Request),
        (status = 400, description = "Missing required field")
    ),
    tag = "Requests"
)]
pub async fn submit_access_request(
    State(pool): State<PgPool>,
    Json(payload): Json<SubmitAccessRequest>,
) -> Result<ApiResponse<Request>, StoreError> {
    let request = lifecycle(pool).submit_access(payload).await?;
    Ok(ApiResponse::success(StatusCode::CREATED, "Access request submitted", request))
}

#[utoipa::path(
    post,
    path = "/requests/contribution-permission",
    request_body = SubmitContributionPermissionRequest,
    responses(
        (status = 201, description = "Contribution permission request submitted as pending", body = Request),
        (status = 400, description = "Missing required field")
    ),
    tag = "Requests"
)]
pub async fn submit_contribution_permission(
    State(pool): State<PgPool>,
    Json(payload): Json<SubmitContributionPermissionRequest>,
) -> Result<ApiResponse<Request>, StoreError> {
    let request = lifecycle(pool).submit_contribution_permission(payload).await?;
    Ok(ApiResponse::success(
        StatusCode::CREATED,
        "Contribution permission request submitted",
        request,
    ))
}

#[utoipa::path(
    get,
    path = "/requests/{id}",
    params(("id" = Uuid, Path, description = "Request id")),
    responses(
        (status = 200, description = "Request retrieved", body = Request),
        (status = 404, description = "Request not found")
    ),
    tag = "Requests"
)]
pub async fn get_request(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Request>, StoreError> {
    let request = RequestStore::new(pool).get(id).await?;
    Ok(ApiResponse::success(StatusCode::OK, "Request retrieved", request))
}

#[utoipa::path(
    get,
    path = "/requests",
    params(Pagination),
    responses(
        (status = 200, description = "Requests, newest first", body = [Request]),
        (status = 503, description = "Store unavailable")
    ),
    tag = "Requests"
)]
pub async fn list_requests(
    State(pool): State<PgPool>,
    Query(pagination): Query<Pagination>,
) -> Result<ApiResponse<Vec<Request>>, StoreError> {
    let (limit, offset) = pagination.limit_offset();
    let requests = RequestStore::new(pool).list(limit, offset).await?;
    Ok(ApiResponse::success(StatusCode::OK, "Requests retrieved", requests))
}

#[utoipa::path(
    get,
    path = "/requests/pending",
    params(Pagination),
    responses(
        (status = 200, description = "Pending requests, oldest first", body = [Request]),
        (status = 503, description = "Store unavailable")
    ),
    tag = "Requests"
)]
pub async fn get_pending_requests(
    State(pool): State<PgPool>,
    Query(pagination): Query<Pagination>,
) -> Result<ApiResponse<Vec<Request>>, StoreError> {
    let (limit, offset) = pagination.limit_offset();
    let requests = RequestStore::new(pool).pending(limit, offset).await?;
    Ok(ApiResponse::success(StatusCode::OK, "Pending requests retrieved", requests))
}

#[utoipa::path(
    get,
    path = "/requests/types/{type}",
    params(
        ("type" = String, Path, description = "Request type tag"),
        Pagination
    ),
    responses(
        (status = 200, description = "Requests of one type, newest first", body = [Request]),
        (status = 503, description = "Store unavailable")
    ),
    tag = "Requests"
)]
pub async fn get_requests_by_type(
    State(pool): State<PgPool>,
    Path(request_type): Path<String>,
    Query(pagination): Query<Pagination>,
) -> Result<ApiResponse<Vec<Request>>, StoreError> {
    let (limit, offset) = pagination.limit_offset();
    let request_type = RequestType::from(request_type.as_str());
    let requests = RequestStore::new(pool)
        .by_type(&request_type, limit, offset)
        .await?;
    Ok(ApiResponse::success(StatusCode::OK, "Requests retrieved", requests))
}

#[utoipa::path(
    patch,
    path = "/requests/{id}/status",
    request_body = ReviewDecision,
    params(("id" = Uuid, Path, description = "Request id")),
    responses(
        (status = 200, description = "Decision recorded", body = Request),
        (status = 400, description = "Invalid decision status or missing rejection reason"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request already decided")
    ),
    tag = "Requests"
)]
pub async fn decide_request(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
    Json(decision): Json<ReviewDecision>,
) -> Result<ApiResponse<Request>, StoreError> {
    let request = lifecycle(pool)
        .decide(
            id,
            &decision.status,
            decision.reviewer_id,
            decision.rejection_reason,
        )
        .await?;
    Ok(ApiResponse::success(StatusCode::OK, "Decision recorded", request))
}

#[utoipa::path(
    put,
    path = "/requests/{id}",
    request_body = UpdateRequest,
    params(("id" = Uuid, Path, description = "Request id")),
    responses(
        (status = 200, description = "Request metadata updated", body = Request),
        (status = 404, description = "Request not found")
    ),
    tag = "Requests"
)]
pub async fn update_request(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRequest>,
) -> Result<ApiResponse<Request>, StoreError> {
    let request = RequestStore::new(pool).update(id, payload).await?;
    Ok(ApiResponse::success(StatusCode::OK, "Request updated", request))
}

#[utoipa::path(
    delete,
    path = "/requests/{id}",
    params(("id" = Uuid, Path, description = "Request id")),
    responses(
        (status = 200, description = "Request deleted (idempotent)"),
        (status = 503, description = "Store unavailable")
    ),
    tag = "Requests"
)]
pub async fn delete_request(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>, StoreError> {
    RequestStore::new(pool).delete(id).await?;
    Ok(ApiResponse::success(StatusCode::OK, "Request deleted", ()))
}

#[utoipa::path(
    post,
    path = "/requests/{id}/comments",
    request_body = NewComment,
    params(("id" = Uuid, Path, description = "Request id")),
    responses(
        (status = 201, description = "Comment added", body = RequestComment),
        (status = 400, description = "Empty comment"),
        (status = 503, description = "Store unavailable")
    ),
    tag = "Requests"
)]
pub async fn add_comment(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NewComment>,
) -> Result<ApiResponse<RequestComment>, StoreError> {
    if payload.comment.trim().is_empty() {
        return Err(StoreError::InvalidArgument("comment is required".into()));
    }

    let comment = RequestStore::new(pool)
        .add_comment(id, payload.user_id, &payload.comment, payload.is_internal)
        .await?;
    Ok(ApiResponse::success(StatusCode::CREATED, "Comment added", comment))
}

#[utoipa::path(
    get,
    path = "/requests/{id}/comments",
    params(("id" = Uuid, Path, description = "Request id")),
    responses(
        (status = 200, description = "Comment thread, oldest first", body = [RequestComment]),
        (status = 503, description = "Store unavailable")
    ),
    tag = "Requests"
)]
pub async fn list_comments(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Vec<RequestComment>>, StoreError> {
    let comments = RequestStore::new(pool).comments(id).await?;
    Ok(ApiResponse::success(StatusCode::OK, "Comments retrieved", comments))
}

#[utoipa::path(
    get,
    path = "/users/{id}/requests",
    params(("id" = Uuid, Path, description = "Requester id"), RequestFilter),
    responses(
        (status = 200, description = "The user's requests, newest first", body = [Request]),
        (status = 400, description = "Unrecognized status filter"),
        (status = 503, description = "Store unavailable")
    ),
    tag = "Requests"
)]
pub async fn get_user_requests(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
    Query(filter): Query<RequestFilter>,
) -> Result<ApiResponse<Vec<Request>>, StoreError> {
    let status = match filter.status.as_deref() {
        None | Some("") => None,
        Some(tag) => Some(RequestStatus::parse(tag).ok_or_else(|| {
            StoreError::InvalidArgument(format!("invalid status filter: {tag:?}"))
        })?),
    };

    let pagination = Pagination {
        page: filter.page,
        limit: filter.limit,
    };
    let (limit, offset) = pagination.limit_offset();
    let requests = RequestStore::new(pool)
        .by_requester(id, status, limit, offset)
        .await?;
    Ok(ApiResponse::success(StatusCode::OK, "Requests retrieved", requests))
}

#[utoipa::path(
    get,
    path = "/users/{id}/requests/all",
    params(("id" = Uuid, Path, description = "Requester id")),
    responses(
        (status = 200, description = "Every request of the user, newest first", body = [Request]),
        (status = 503, description = "Store unavailable")
    ),
    tag = "Requests"
)]
pub async fn get_all_user_requests(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Vec<Request>>, StoreError> {
    let requests = RequestStore::new(pool).all_by_requester(id).await?;
    Ok(ApiResponse::success(StatusCode::OK, "Requests retrieved", requests))
}

#[utoipa::path(
    get,
    path = "/users/{id}/requests/stats",
    params(("id" = Uuid, Path, description = "Requester id")),
    responses(
        (status = 200, description = "Request counts grouped by status", body = RequestStats),
        (status = 503, description = "Store unavailable")
    ),
    tag = "Requests"
)]
pub async fn get_user_request_stats(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<RequestStats>, StoreError> {
    let stats = RequestStore::new(pool).stats(id).await?;
    Ok(ApiResponse::success(StatusCode::OK, "Request stats retrieved", stats))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        submit_project_request,
        submit_pull_request_approval,
        submit_access_request,
        submit_contribution_permission,
        get_request,
        list_requests,
        get_pending_requests,
        get_requests_by_type,
        decide_request,
        update_request,
        delete_request,
        add_comment,
        list_comments,
        get_user_requests,
        get_all_user_requests,
        get_user_request_stats,
    ),
    components(schemas(
        Request,
        UpdateRequest,
        RequestComment,
        RequestStats,
        SubmitProjectRequest,
        SubmitPullRequestApproval,
        SubmitAccessRequest,
        SubmitContributionPermissionRequest,
        ReviewDecision,
        NewComment
    )),
    tags(
        (name = "Requests", description = "Request lifecycle, comments, and review queue")
    )
)]
pub struct RequestDoc;
