use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::features::issues::models::{IssueCategory, IssuePriority, IssueStatus};
use crate::shared::constants::DEFAULT_PAGE_SIZE;
use crate::shared::types::PaginationQuery;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Query parameters for the admin issue list
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct AdminIssueQuery {
    /// Page number (1-indexed, default: 1)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Number of items per page (default: 10, max: 100)
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,

    #[param(value_type = Option<String>, example = "In Progress")]
    pub status: Option<IssueStatus>,

    #[param(value_type = Option<String>, example = "road")]
    pub category: Option<IssueCategory>,

    #[param(value_type = Option<String>, example = "high")]
    pub priority: Option<IssuePriority>,

    /// Matched against title, description and address (case-insensitive)
    pub search: Option<String>,

    /// Order by creation time (default: desc)
    #[param(value_type = Option<String>, example = "desc")]
    #[serde(default)]
    pub sort: SortOrder,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for AdminIssueQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            status: None,
            category: None,
            priority: None,
            search: None,
            sort: SortOrder::default(),
        }
    }
}

impl AdminIssueQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            page_size: self.page_size,
        }
    }

    /// Search term with surrounding whitespace removed; blank means no search
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
