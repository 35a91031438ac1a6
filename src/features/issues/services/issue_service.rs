use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::classification::models::{ClassificationResult, PredictedCategory};
use crate::features::classification::{ClassificationService, ThresholdPolicy};
use crate::features::issues::dtos::{
    ClassificationSource, CreateIssueDto, CreatedIssueDto, IssueClassificationDto, IssueDetailDto,
    IssueResponseDto, RecentActivityDto, UpdateIssueDto,
};
use crate::features::issues::models::{
    CreateIssue, IssueCategory, IssuePriority, IssueRecord, UpdateIssue,
};
use crate::modules::storage::{object_key, ImageStore};
use crate::shared::constants::{ISSUE_IMAGE_FOLDER, RECENT_ACTIVITY_LIMIT};
use crate::shared::types::PaginationQuery;
use crate::shared::upload::UploadedImage;

/// Issue columns joined with reporter/resolver usernames and vote/comment counts.
/// Callers append their own WHERE / ORDER BY.
pub const ISSUE_SELECT: &str = r#"
    SELECT
        i.id, i.title, i.description, i.image_url, i.address,
        i.category, i.priority, i.status,
        i.reporter_id, r.username AS reporter_username,
        i.resolved_by, rb.username AS resolved_by_username,
        (SELECT COUNT(*) FROM issue_votes v WHERE v.issue_id = i.id) AS upvotes_count,
        (SELECT COUNT(*) FROM comments c WHERE c.issue_id = i.id) AS comments_count,
        i.created_at, i.updated_at
    FROM issues i
    JOIN users r ON r.id = i.reporter_id
    LEFT JOIN users rb ON rb.id = i.resolved_by
"#;

/// Service for issue operations
pub struct IssueService {
    pool: PgPool,
    classifier: Arc<ClassificationService>,
    policy: ThresholdPolicy,
    store: Arc<dyn ImageStore>,
}

impl IssueService {
    pub fn new(
        pool: PgPool,
        classifier: Arc<ClassificationService>,
        policy: ThresholdPolicy,
        store: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            pool,
            classifier,
            policy,
            store,
        }
    }

    /// Report a new issue.
    ///
    /// The image (if any) must already have passed `UploadedImage::validate_for_storage`.
    pub async fn create(
        &self,
        reporter: &AuthenticatedUser,
        dto: CreateIssueDto,
        image: Option<UploadedImage>,
    ) -> Result<CreatedIssueDto> {
        let classification = match &image {
            Some(image) => Some(self.classify(&dto, image).await),
            None => None,
        };

        let category = final_category(classification.as_ref().map(|c| c.category), dto.category);
        let priority = dto
            .priority
            .unwrap_or_else(|| IssuePriority::default_for(category));

        let image_url = match image {
            Some(image) => {
                let key = object_key(ISSUE_IMAGE_FOLDER, reporter.id, image.extension());
                Some(
                    self.store
                        .put(&key, image.bytes.to_vec(), &image.content_type)
                        .await?,
                )
            }
            None => None,
        };

        let data = CreateIssue {
            title: dto.title,
            description: dto.description,
            address: dto.address,
            image_url,
            category,
            priority,
            reporter_id: reporter.id,
        };

        let id = match self.insert(&data).await {
            Ok(id) => id,
            Err(e) => {
                if let Some(url) = &data.image_url {
                    self.remove_image(url).await;
                }
                return Err(e);
            }
        };

        tracing::info!(
            "Created issue {} ({}, {:?}) for reporter {}",
            id,
            category,
            priority,
            reporter.username
        );

        let record = self.find_record(id).await?;

        Ok(CreatedIssueDto {
            issue: record.into(),
            classification,
        })
    }

    /// Trust the client's pre-check when it clears the policy, otherwise run the model
    async fn classify(&self, dto: &CreateIssueDto, image: &UploadedImage) -> IssueClassificationDto {
        if let Some(result) = accepted_precheck(&self.policy, dto.category, dto.confidence) {
            tracing::debug!(
                "Using client pre-check {} ({:.2})",
                result.category,
                result.confidence
            );
            return IssueClassificationDto::new(result, ClassificationSource::Client);
        }

        let result = self
            .classifier
            .classify(image.bytes.clone(), &self.policy)
            .await;
        IssueClassificationDto::new(result, ClassificationSource::Model)
    }

    async fn insert(&self, data: &CreateIssue) -> Result<Uuid> {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO issues (title, description, address, image_url, category, priority, reporter_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.address)
        .bind(&data.image_url)
        .bind(data.category)
        .bind(data.priority)
        .bind(data.reporter_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create issue: {:?}", e);
            AppError::Database(e)
        })
    }

    pub async fn find_record(&self, id: Uuid) -> Result<IssueRecord> {
        let query = format!("{} WHERE i.id = $1", ISSUE_SELECT);

        sqlx::query_as::<_, IssueRecord>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch issue {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound("Issue not found".to_string()))
    }

    /// Issues reported by `reporter_id`, newest first
    pub async fn list_for_reporter(&self, reporter_id: Uuid) -> Result<Vec<IssueResponseDto>> {
        let query = format!(
            "{} WHERE i.reporter_id = $1 ORDER BY i.created_at DESC",
            ISSUE_SELECT
        );

        let records = sqlx::query_as::<_, IssueRecord>(&query)
            .bind(reporter_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list issues for reporter {}: {:?}", reporter_id, e);
                AppError::Database(e)
            })?;

        Ok(to_responses(records))
    }

    /// Community feed of every issue, newest first
    pub async fn list_public(
        &self,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<IssueResponseDto>, i64)> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM issues")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count issues: {:?}", e);
                AppError::Database(e)
            })?;

        let query = format!(
            "{} ORDER BY i.created_at DESC LIMIT $1 OFFSET $2",
            ISSUE_SELECT
        );

        let records = sqlx::query_as::<_, IssueRecord>(&query)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list public issues: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((to_responses(records), total))
    }

    pub async fn recent_activity(&self) -> Result<Vec<RecentActivityDto>> {
        let query = format!("{} ORDER BY i.created_at DESC LIMIT $1", ISSUE_SELECT);

        let records = sqlx::query_as::<_, IssueRecord>(&query)
            .bind(RECENT_ACTIVITY_LIMIT)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch recent activity: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(records.into_iter().map(RecentActivityDto::from).collect())
    }

    pub async fn get_detail(&self, id: Uuid, user_id: Uuid) -> Result<IssueDetailDto> {
        let record = self.find_record(id).await?;

        let user_has_voted = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM issue_votes WHERE issue_id = $1 AND user_id = $2)",
        )
        .bind(id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check vote on issue {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        Ok(IssueDetailDto {
            issue: record.into(),
            user_has_voted,
        })
    }

    /// Admins may edit any issue, reporters only their own. Anything else is a 404.
    ///
    /// When an admin moves an issue to Resolved or Closed they are recorded as
    /// the resolver.
    pub async fn update(
        &self,
        id: Uuid,
        user: &AuthenticatedUser,
        dto: UpdateIssueDto,
    ) -> Result<IssueResponseDto> {
        let changes = UpdateIssue {
            title: dto.title,
            description: dto.description,
            address: dto.address,
            category: dto.category,
            priority: dto.priority,
            status: dto.status,
        };

        let updated = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE issues SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                address = COALESCE($5, address),
                category = COALESCE($6, category),
                priority = COALESCE($7, priority),
                status = COALESCE($8, status),
                resolved_by = CASE
                    WHEN $9 AND COALESCE($8, status) IN ('Resolved', 'Closed') THEN $2
                    ELSE resolved_by
                END,
                updated_at = NOW()
            WHERE id = $1 AND ($9 OR reporter_id = $2)
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(user.id)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(&changes.address)
        .bind(changes.category)
        .bind(changes.priority)
        .bind(changes.status)
        .bind(user.is_admin())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update issue {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        if updated.is_none() {
            return Err(AppError::NotFound("Issue not found".to_string()));
        }

        if let Some(status) = changes.status {
            tracing::info!("Issue {} set to '{}' by {}", id, status, user.username);
        }

        Ok(self.find_record(id).await?.into())
    }

    /// Reporters may delete only their own issues; the stored photo is removed best-effort
    pub async fn delete(&self, id: Uuid, user: &AuthenticatedUser) -> Result<()> {
        let deleted = sqlx::query_scalar::<_, Option<String>>(
            "DELETE FROM issues WHERE id = $1 AND reporter_id = $2 RETURNING image_url",
        )
        .bind(id)
        .bind(user.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete issue {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        let image_url = deleted.ok_or_else(|| AppError::NotFound("Issue not found".to_string()))?;

        if let Some(url) = image_url {
            self.remove_image(&url).await;
        }

        tracing::info!("Deleted issue {} by {}", id, user.username);
        Ok(())
    }

    async fn remove_image(&self, url: &str) {
        if let Err(e) = self.store.delete_by_url(url).await {
            tracing::warn!("Failed to remove stored image {}: {}", url, e);
        }
    }
}

fn to_responses(records: Vec<IssueRecord>) -> Vec<IssueResponseDto> {
    let today = Utc::now().date_naive();
    records
        .into_iter()
        .map(|record| IssueResponseDto::from_record(record, today))
        .collect()
}

/// Client-supplied category and confidence, if both are present and clear the policy
fn accepted_precheck(
    policy: &ThresholdPolicy,
    category: Option<IssueCategory>,
    confidence: Option<f32>,
) -> Option<ClassificationResult> {
    let category = PredictedCategory::from(category?);
    let confidence = confidence?;

    policy.accepts(category, confidence).then_some(ClassificationResult {
        category,
        confidence,
    })
}

/// Classified category when it is not unknown, else the client's hint, else `other`
fn final_category(
    classified: Option<PredictedCategory>,
    hint: Option<IssueCategory>,
) -> IssueCategory {
    classified
        .and_then(PredictedCategory::issue_category)
        .or(hint)
        .unwrap_or(IssueCategory::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> ThresholdPolicy {
        ThresholdPolicy::new(0.5, 0.6).unwrap()
    }

    #[test]
    fn test_precheck_accepted_when_it_clears_policy() {
        let result = accepted_precheck(&policy(), Some(IssueCategory::Water), Some(0.55)).unwrap();
        assert_eq!(result.category, PredictedCategory::Water);
        assert_eq!(result.confidence, 0.55);
    }

    #[test]
    fn test_precheck_other_needs_stricter_threshold() {
        assert!(accepted_precheck(&policy(), Some(IssueCategory::Other), Some(0.55)).is_none());
        assert!(accepted_precheck(&policy(), Some(IssueCategory::Other), Some(0.6)).is_some());
    }

    #[test]
    fn test_precheck_requires_category_and_confidence() {
        assert!(accepted_precheck(&policy(), Some(IssueCategory::Road), None).is_none());
        assert!(accepted_precheck(&policy(), None, Some(0.99)).is_none());
        assert!(accepted_precheck(&policy(), Some(IssueCategory::Road), Some(0.3)).is_none());
    }

    #[test]
    fn test_precheck_out_of_range_confidence_is_ignored() {
        for confidence in [5.0, -0.1, f32::NAN] {
            assert!(accepted_precheck(&policy(), Some(IssueCategory::Road), Some(confidence)).is_none());
        }
    }

    #[test]
    fn test_final_category_prefers_classification() {
        assert_eq!(
            final_category(Some(PredictedCategory::Garbage), Some(IssueCategory::Road)),
            IssueCategory::Garbage
        );
    }

    #[test]
    fn test_final_category_falls_back_to_hint_then_other() {
        assert_eq!(
            final_category(Some(PredictedCategory::Unknown), Some(IssueCategory::Road)),
            IssueCategory::Road
        );
        assert_eq!(
            final_category(Some(PredictedCategory::Unknown), None),
            IssueCategory::Other
        );
        assert_eq!(final_category(None, Some(IssueCategory::Water)), IssueCategory::Water);
        assert_eq!(final_category(None, None), IssueCategory::Other);
    }
}
