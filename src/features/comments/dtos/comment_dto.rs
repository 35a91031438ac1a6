use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::comments::models::{Comment, CommentWithIssue};

/// Request body for creating or editing a comment
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CommentTextDto {
    #[validate(length(max = 2000, message = "Comment must be at most 2000 characters"))]
    #[schema(example = "Still broken as of this morning.")]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CommentResponseDto {
    pub id: Uuid,
    pub issue: Uuid,
    pub user: Uuid,
    pub user_username: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponseDto {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            issue: comment.issue_id,
            user: comment.user_id,
            user_username: comment.user_username,
            text: comment.text,
            created_at: comment.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MyCommentDto {
    pub id: Uuid,
    pub issue_id: Uuid,
    pub issue_title: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<CommentWithIssue> for MyCommentDto {
    fn from(comment: CommentWithIssue) -> Self {
        Self {
            id: comment.id,
            issue_id: comment.issue_id,
            issue_title: comment.issue_title,
            text: comment.text,
            created_at: comment.created_at,
        }
    }
}

/// The caller's total comment count and their latest comments
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MyCommentsDto {
    pub count: i64,
    pub comments: Vec<MyCommentDto>,
}
