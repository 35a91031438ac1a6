use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::issues::models::{IssueCategory, IssueStatus};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusCountDto {
    pub status: IssueStatus,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryCountDto {
    pub category: IssueCategory,
    pub count: i64,
}

/// Number of issues reported on one day
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DailyCountDto {
    pub date: NaiveDate,
    pub count: i64,
}

/// Community-wide statistics for the analytics page
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardSummaryDto {
    pub total_issues: i64,
    /// Every status, including those with no issues
    pub by_status: Vec<StatusCountDto>,
    /// Every category, including those with no issues
    pub by_category: Vec<CategoryCountDto>,
    pub total_upvotes: i64,
    pub total_comments: i64,
    /// Oldest day first; days without reports are omitted
    pub timeline: Vec<DailyCountDto>,
}
