use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::issues::dtos::{VoteResponseDto, VotedIssueDto};

/// Service for issue upvotes
pub struct VoteService {
    pool: PgPool,
}

impl VoteService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Toggle the caller's upvote. Voting on your own issue changes nothing.
    pub async fn toggle(&self, issue_id: Uuid, user_id: Uuid) -> Result<VoteResponseDto> {
        let reporter_id = self.reporter_of(issue_id).await?;

        if reporter_id == user_id {
            return Ok(VoteResponseDto {
                message: "Self-vote not allowed".to_string(),
                upvotes_count: self.count(issue_id).await?,
                user_has_voted: false,
            });
        }

        let removed = self.delete_vote(issue_id, user_id).await?;

        let (message, user_has_voted) = if removed {
            ("Vote removed", false)
        } else {
            sqlx::query(
                "INSERT INTO issue_votes (issue_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(issue_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to add vote on issue {}: {:?}", issue_id, e);
                AppError::Database(e)
            })?;
            ("Vote added", true)
        };

        Ok(VoteResponseDto {
            message: message.to_string(),
            upvotes_count: self.count(issue_id).await?,
            user_has_voted,
        })
    }

    /// Explicitly remove the caller's upvote
    pub async fn remove(&self, issue_id: Uuid, user_id: Uuid) -> Result<()> {
        self.reporter_of(issue_id).await?;

        if !self.delete_vote(issue_id, user_id).await? {
            return Err(AppError::BadRequest("No vote to remove".to_string()));
        }

        Ok(())
    }

    /// Issues the user has upvoted, most recent vote first
    pub async fn voted_issues(&self, user_id: Uuid) -> Result<Vec<VotedIssueDto>> {
        sqlx::query_as::<_, VotedIssueDto>(
            r#"
            SELECT i.id AS issue_id, i.title AS issue_title
            FROM issue_votes v
            JOIN issues i ON i.id = v.issue_id
            WHERE v.user_id = $1
            ORDER BY v.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list voted issues for {}: {:?}", user_id, e);
            AppError::Database(e)
        })
    }

    async fn reporter_of(&self, issue_id: Uuid) -> Result<Uuid> {
        sqlx::query_scalar::<_, Uuid>("SELECT reporter_id FROM issues WHERE id = $1")
            .bind(issue_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch issue {}: {:?}", issue_id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound("Issue not found".to_string()))
    }

    async fn delete_vote(&self, issue_id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM issue_votes WHERE issue_id = $1 AND user_id = $2")
            .bind(issue_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to remove vote on issue {}: {:?}", issue_id, e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self, issue_id: Uuid) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM issue_votes WHERE issue_id = $1")
            .bind(issue_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count votes on issue {}: {:?}", issue_id, e);
                AppError::Database(e)
            })
    }
}
