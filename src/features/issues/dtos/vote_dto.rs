use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Response DTO for the upvote toggle
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VoteResponseDto {
    #[schema(example = "Vote added")]
    pub message: String,
    pub upvotes_count: i64,
    pub user_has_voted: bool,
}

/// Issue the caller has upvoted
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct VotedIssueDto {
    pub issue_id: Uuid,
    pub issue_title: String,
}
