use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::comments::dtos::{CommentResponseDto, MyCommentDto, MyCommentsDto};
use crate::features::comments::models::{Comment, CommentWithIssue};
use crate::shared::constants::MY_COMMENTS_LIMIT;

const COMMENT_SELECT: &str = r#"
    SELECT c.id, c.issue_id, c.user_id, u.username AS user_username, c.text, c.created_at
    FROM comments c
    JOIN users u ON u.id = c.user_id
"#;

/// Service for issue comments
pub struct CommentService {
    pool: PgPool,
}

impl CommentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Comments on an issue, oldest first
    pub async fn list_for_issue(&self, issue_id: Uuid) -> Result<Vec<CommentResponseDto>> {
        self.ensure_issue_exists(issue_id).await?;

        let comments = sqlx::query_as::<_, Comment>(&format!(
            "{} WHERE c.issue_id = $1 ORDER BY c.created_at ASC",
            COMMENT_SELECT
        ))
        .bind(issue_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list comments for issue {}: {:?}", issue_id, e);
            AppError::Database(e)
        })?;

        Ok(comments.into_iter().map(Into::into).collect())
    }

    pub async fn create(
        &self,
        issue_id: Uuid,
        user_id: Uuid,
        text: &str,
    ) -> Result<CommentResponseDto> {
        let text = normalize_text(text)?;
        self.ensure_issue_exists(issue_id).await?;

        let id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO comments (issue_id, user_id, text) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(issue_id)
        .bind(user_id)
        .bind(&text)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create comment on issue {}: {:?}", issue_id, e);
            AppError::Database(e)
        })?;

        tracing::debug!("Comment {} added to issue {}", id, issue_id);
        Ok(self.find(id).await?.into())
    }

    /// Edit a comment. Someone else's comment is reported as missing.
    pub async fn update(&self, id: Uuid, user_id: Uuid, text: &str) -> Result<CommentResponseDto> {
        let text = normalize_text(text)?;

        let updated = sqlx::query_scalar::<_, Uuid>(
            "UPDATE comments SET text = $3 WHERE id = $1 AND user_id = $2 RETURNING id",
        )
        .bind(id)
        .bind(user_id)
        .bind(&text)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update comment {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        if updated.is_none() {
            return Err(AppError::NotFound("Comment not found".to_string()));
        }

        Ok(self.find(id).await?.into())
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<()> {
        let comment = self.find(id).await?;

        if comment.user_id != user_id {
            return Err(AppError::Forbidden(
                "You can only delete your own comments".to_string(),
            ));
        }

        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete comment {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        Ok(())
    }

    /// Total comment count for the user plus their most recent comments
    pub async fn my_comments(&self, user_id: Uuid) -> Result<MyCommentsDto> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to count comments for {}: {:?}", user_id, e);
                    AppError::Database(e)
                })?;

        let comments = sqlx::query_as::<_, CommentWithIssue>(
            r#"
            SELECT c.id, c.issue_id, i.title AS issue_title, c.text, c.created_at
            FROM comments c
            JOIN issues i ON i.id = c.issue_id
            WHERE c.user_id = $1
            ORDER BY c.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(MY_COMMENTS_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list comments for {}: {:?}", user_id, e);
            AppError::Database(e)
        })?;

        Ok(MyCommentsDto {
            count,
            comments: comments.into_iter().map(MyCommentDto::from).collect(),
        })
    }

    async fn find(&self, id: Uuid) -> Result<Comment> {
        sqlx::query_as::<_, Comment>(&format!("{} WHERE c.id = $1", COMMENT_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch comment {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))
    }

    async fn ensure_issue_exists(&self, issue_id: Uuid) -> Result<()> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM issues WHERE id = $1)")
                .bind(issue_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to check issue {}: {:?}", issue_id, e);
                    AppError::Database(e)
                })?;

        if !exists {
            return Err(AppError::NotFound("Issue not found".to_string()));
        }

        Ok(())
    }
}

/// Trim surrounding whitespace and reject text that is empty afterwards
fn normalize_text(text: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(
            "Comment text cannot be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text_trims() {
        assert_eq!(normalize_text("  pothole still there \n").unwrap(), "pothole still there");
    }

    #[test]
    fn test_normalize_text_rejects_blank() {
        for blank in ["", "   ", "\n\t"] {
            assert!(matches!(normalize_text(blank), Err(AppError::Validation(_))));
        }
    }
}
