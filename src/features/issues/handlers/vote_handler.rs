use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::issues::dtos::{VoteResponseDto, VotedIssueDto};
use crate::features::issues::services::VoteService;
use crate::shared::types::ApiResponse;

/// Toggle the caller's upvote on an issue
#[utoipa::path(
    post,
    path = "/api/issue/{id}/upvote",
    tag = "votes",
    params(
        ("id" = Uuid, Path, description = "Issue ID")
    ),
    responses(
        (status = 200, description = "Vote toggled (self-votes are ignored)", body = ApiResponse<VoteResponseDto>),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Issue not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upvote_issue(
    user: AuthenticatedUser,
    State(service): State<Arc<VoteService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<VoteResponseDto>>> {
    let vote = service.toggle(id, user.id).await?;
    let message = vote.message.clone();
    Ok(Json(ApiResponse::success(Some(vote), Some(message), None)))
}

/// Remove the caller's upvote
#[utoipa::path(
    post,
    path = "/api/issue/{id}/remove-vote",
    tag = "votes",
    params(
        ("id" = Uuid, Path, description = "Issue ID")
    ),
    responses(
        (status = 200, description = "Vote removed"),
        (status = 400, description = "No vote to remove"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Issue not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn remove_vote(
    user: AuthenticatedUser,
    State(service): State<Arc<VoteService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.remove(id, user.id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Vote removed".to_string()),
        None,
    )))
}

/// Issues the caller has upvoted
#[utoipa::path(
    get,
    path = "/api/user-voted-issues",
    tag = "votes",
    responses(
        (status = 200, description = "Voted issues retrieved", body = ApiResponse<Vec<VotedIssueDto>>),
        (status = 401, description = "Authentication required")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn user_voted_issues(
    user: AuthenticatedUser,
    State(service): State<Arc<VoteService>>,
) -> Result<Json<ApiResponse<Vec<VotedIssueDto>>>> {
    let issues = service.voted_issues(user.id).await?;
    Ok(Json(ApiResponse::success(Some(issues), None, None)))
}
