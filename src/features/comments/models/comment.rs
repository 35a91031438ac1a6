use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Comment row joined with its author's username
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub issue_id: Uuid,
    pub user_id: Uuid,
    pub user_username: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Comment row joined with the title of the issue it belongs to
#[derive(Debug, Clone, FromRow)]
pub struct CommentWithIssue {
    pub id: Uuid,
    pub issue_id: Uuid,
    pub issue_title: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}
