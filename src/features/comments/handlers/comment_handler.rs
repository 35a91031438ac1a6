use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::comments::dtos::{CommentResponseDto, CommentTextDto, MyCommentsDto};
use crate::features::comments::services::CommentService;
use crate::shared::types::{ApiResponse, Meta};

/// List comments on an issue, oldest first
#[utoipa::path(
    get,
    path = "/api/issue/{id}/comments",
    tag = "comments",
    params(
        ("id" = Uuid, Path, description = "Issue ID")
    ),
    responses(
        (status = 200, description = "Comments retrieved", body = ApiResponse<Vec<CommentResponseDto>>),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Issue not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_comments(
    _user: AuthenticatedUser,
    State(service): State<Arc<CommentService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<CommentResponseDto>>>> {
    let comments = service.list_for_issue(id).await?;
    let total = comments.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(comments),
        None,
        Some(Meta { total }),
    )))
}

/// Comment on an issue
#[utoipa::path(
    post,
    path = "/api/issue/{id}/comments",
    tag = "comments",
    params(
        ("id" = Uuid, Path, description = "Issue ID")
    ),
    request_body = CommentTextDto,
    responses(
        (status = 201, description = "Comment created", body = ApiResponse<CommentResponseDto>),
        (status = 400, description = "Comment text is blank"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Issue not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_comment(
    user: AuthenticatedUser,
    State(service): State<Arc<CommentService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<CommentTextDto>,
) -> Result<(StatusCode, Json<ApiResponse<CommentResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let comment = service.create(id, user.id, &dto.text).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(comment), None, None)),
    ))
}

/// Edit one of the caller's comments
#[utoipa::path(
    put,
    path = "/api/comment/{id}/update",
    tag = "comments",
    params(
        ("id" = Uuid, Path, description = "Comment ID")
    ),
    request_body = CommentTextDto,
    responses(
        (status = 200, description = "Comment updated", body = ApiResponse<CommentResponseDto>),
        (status = 400, description = "Comment text is blank"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Comment not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_comment(
    user: AuthenticatedUser,
    State(service): State<Arc<CommentService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<CommentTextDto>,
) -> Result<Json<ApiResponse<CommentResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let comment = service.update(id, user.id, &dto.text).await?;
    Ok(Json(ApiResponse::success(Some(comment), None, None)))
}

/// Delete one of the caller's comments
#[utoipa::path(
    delete,
    path = "/api/comment/{id}/delete",
    tag = "comments",
    params(
        ("id" = Uuid, Path, description = "Comment ID")
    ),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Comment not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_comment(
    user: AuthenticatedUser,
    State(service): State<Arc<CommentService>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    service.delete(id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The caller's comment count and ten latest comments
#[utoipa::path(
    get,
    path = "/api/my-comments",
    tag = "comments",
    responses(
        (status = 200, description = "Comments retrieved", body = ApiResponse<MyCommentsDto>),
        (status = 401, description = "Authentication required")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn my_comments(
    user: AuthenticatedUser,
    State(service): State<Arc<CommentService>>,
) -> Result<Json<ApiResponse<MyCommentsDto>>> {
    let comments = service.my_comments(user.id).await?;
    Ok(Json(ApiResponse::success(Some(comments), None, None)))
}
