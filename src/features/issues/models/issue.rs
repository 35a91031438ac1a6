use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Issue category enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "issue_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    Road,
    Garbage,
    Water,
    Electricity,
    Other,
}

impl IssueCategory {
    pub const ALL: [IssueCategory; 5] = [
        IssueCategory::Road,
        IssueCategory::Garbage,
        IssueCategory::Water,
        IssueCategory::Electricity,
        IssueCategory::Other,
    ];
}

impl std::fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueCategory::Road => write!(f, "road"),
            IssueCategory::Garbage => write!(f, "garbage"),
            IssueCategory::Water => write!(f, "water"),
            IssueCategory::Electricity => write!(f, "electricity"),
            IssueCategory::Other => write!(f, "other"),
        }
    }
}

impl FromStr for IssueCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "road" => Ok(IssueCategory::Road),
            "garbage" => Ok(IssueCategory::Garbage),
            "water" => Ok(IssueCategory::Water),
            "electricity" => Ok(IssueCategory::Electricity),
            "other" => Ok(IssueCategory::Other),
            other => Err(format!("Invalid category: {}", other)),
        }
    }
}

/// Issue priority enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "issue_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum IssuePriority {
    Low,
    Medium,
    High,
}

impl IssuePriority {
    /// Priority assigned when the reporter leaves it blank
    pub fn default_for(category: IssueCategory) -> Self {
        match category {
            IssueCategory::Electricity | IssueCategory::Water => IssuePriority::High,
            IssueCategory::Garbage | IssueCategory::Road => IssuePriority::Medium,
            IssueCategory::Other => IssuePriority::Low,
        }
    }
}

impl FromStr for IssuePriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(IssuePriority::Low),
            "medium" => Ok(IssuePriority::Medium),
            "high" => Ok(IssuePriority::High),
            other => Err(format!("Invalid priority: {}", other)),
        }
    }
}

/// Issue lifecycle status. Any value may be set by an authorized actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "issue_status")]
pub enum IssueStatus {
    Open,
    Acknowledged,
    #[sqlx(rename = "In Progress")]
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
    Closed,
}

impl IssueStatus {
    pub const ALL: [IssueStatus; 5] = [
        IssueStatus::Open,
        IssueStatus::Acknowledged,
        IssueStatus::InProgress,
        IssueStatus::Resolved,
        IssueStatus::Closed,
    ];

    /// Resolved or Closed
    pub fn is_terminal(self) -> bool {
        matches!(self, IssueStatus::Resolved | IssueStatus::Closed)
    }
}

impl std::fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueStatus::Open => write!(f, "Open"),
            IssueStatus::Acknowledged => write!(f, "Acknowledged"),
            IssueStatus::InProgress => write!(f, "In Progress"),
            IssueStatus::Resolved => write!(f, "Resolved"),
            IssueStatus::Closed => write!(f, "Closed"),
        }
    }
}

/// Issue row joined with reporter/resolver names and vote/comment counts
#[derive(Debug, Clone, FromRow)]
pub struct IssueRecord {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub address: String,
    pub category: IssueCategory,
    pub priority: IssuePriority,
    pub status: IssueStatus,
    pub reporter_id: Uuid,
    pub reporter_username: String,
    pub resolved_by: Option<Uuid>,
    pub resolved_by_username: Option<String>,
    pub upvotes_count: i64,
    pub comments_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IssueRecord {
    pub fn days_open(&self, today: NaiveDate) -> i64 {
        days_open(self.status, self.created_at, self.updated_at, today)
    }
}

/// Whole days an issue has been open.
///
/// Resolved and Closed issues stop counting at their last update.
pub fn days_open(
    status: IssueStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    today: NaiveDate,
) -> i64 {
    let end = if status.is_terminal() {
        updated_at.date_naive()
    } else {
        today
    };

    (end - created_at.date_naive()).num_days().max(0)
}

/// Data for creating a new issue
#[derive(Debug)]
pub struct CreateIssue {
    pub title: String,
    pub description: String,
    pub address: String,
    pub image_url: Option<String>,
    pub category: IssueCategory,
    pub priority: IssuePriority,
    pub reporter_id: Uuid,
}

/// Partial update; `None` leaves the column unchanged
#[derive(Debug, Default)]
pub struct UpdateIssue {
    pub title: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub category: Option<IssueCategory>,
    pub priority: Option<IssuePriority>,
    pub status: Option<IssueStatus>,
}
