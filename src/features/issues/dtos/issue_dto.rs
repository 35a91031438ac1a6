use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::classification::models::{ClassificationResult, PredictedCategory};
use crate::features::issues::models::{IssueCategory, IssuePriority, IssueRecord, IssueStatus};

/// Multipart form for reporting an issue (Swagger UI documentation only)
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct ReportIssueFormDto {
    #[schema(example = "Broken streetlight on Jl. Merdeka")]
    pub title: String,
    pub description: String,
    #[schema(example = "Jl. Merdeka No. 12, Bandung")]
    pub address: String,
    /// Category hint, or the category returned by `/api/predict`
    #[schema(example = "electricity")]
    pub category: Option<String>,
    #[schema(example = "high")]
    pub priority: Option<String>,
    /// Confidence returned by `/api/predict` for `category`
    #[schema(example = 0.87)]
    pub confidence: Option<f32>,
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub image: Option<String>,
}

/// Text fields of the report form, validated before anything is stored
#[derive(Debug, Default, Validate)]
pub struct CreateIssueDto {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(length(min = 1, max = 255, message = "Address must be 1-255 characters"))]
    pub address: String,

    pub category: Option<IssueCategory>,
    pub priority: Option<IssuePriority>,
    #[validate(range(min = 0.0, max = 1.0, message = "Confidence must be between 0 and 1"))]
    pub confidence: Option<f32>,
}

/// Request DTO for updating an issue
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateIssueDto {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 255, message = "Address must be 1-255 characters"))]
    pub address: Option<String>,

    pub category: Option<IssueCategory>,
    pub priority: Option<IssuePriority>,
    pub status: Option<IssueStatus>,
}

/// Response DTO for an issue
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IssueResponseDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Public URL of the uploaded photo
    pub image: Option<String>,
    pub address: String,
    pub category: IssueCategory,
    pub priority: IssuePriority,
    pub status: IssueStatus,
    pub reporter: Uuid,
    pub reporter_username: String,
    pub resolved_by: Option<Uuid>,
    pub resolved_by_username: Option<String>,
    pub upvotes_count: i64,
    pub comments_count: i64,
    pub days_open: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IssueResponseDto {
    pub fn from_record(record: IssueRecord, today: NaiveDate) -> Self {
        let days_open = record.days_open(today);
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            image: record.image_url,
            address: record.address,
            category: record.category,
            priority: record.priority,
            status: record.status,
            reporter: record.reporter_id,
            reporter_username: record.reporter_username,
            resolved_by: record.resolved_by,
            resolved_by_username: record.resolved_by_username,
            upvotes_count: record.upvotes_count,
            comments_count: record.comments_count,
            days_open,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

impl From<IssueRecord> for IssueResponseDto {
    fn from(record: IssueRecord) -> Self {
        Self::from_record(record, Utc::now().date_naive())
    }
}

/// Issue detail including the caller's vote
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IssueDetailDto {
    #[serde(flatten)]
    pub issue: IssueResponseDto,
    pub user_has_voted: bool,
}

/// Classification outcome returned alongside a newly reported issue
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct IssueClassificationDto {
    pub category: PredictedCategory,
    pub confidence: f32,
    /// `client` when the submitted pre-check was accepted, `model` otherwise
    pub source: ClassificationSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationSource {
    Client,
    Model,
}

impl IssueClassificationDto {
    pub fn new(result: ClassificationResult, source: ClassificationSource) -> Self {
        Self {
            category: result.category,
            confidence: result.confidence,
            source,
        }
    }
}

/// Response DTO for issue creation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedIssueDto {
    #[serde(flatten)]
    pub issue: IssueResponseDto,
    /// Absent when the report carried no image
    pub classification: Option<IssueClassificationDto>,
}

/// Compact issue entry for the home page activity feed
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecentActivityDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: IssueCategory,
    pub status: IssueStatus,
    pub created_at: DateTime<Utc>,
    pub reporter: String,
}

impl From<IssueRecord> for RecentActivityDto {
    fn from(record: IssueRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            category: record.category,
            status: record.status,
            created_at: record.created_at,
            reporter: record.reporter_username,
        }
    }
}
