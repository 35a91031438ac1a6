use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::core::error::{AppError, Result};
use crate::features::admin::dtos::AdminIssueQuery;
use crate::features::issues::dtos::IssueResponseDto;
use crate::features::issues::models::IssueRecord;
use crate::features::issues::services::ISSUE_SELECT;

pub struct AdminService {
    pool: PgPool,
}

impl AdminService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Filtered, paginated issue list for triage
    pub async fn list_issues(&self, query: &AdminIssueQuery) -> Result<(Vec<IssueResponseDto>, i64)> {
        let pagination = query.pagination();

        let mut list_builder = QueryBuilder::<Postgres>::new(ISSUE_SELECT);
        push_filters(&mut list_builder, query);
        list_builder
            .push(" ORDER BY i.created_at ")
            .push(query.sort.as_sql())
            .push(" LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let mut count_builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM issues i");
        push_filters(&mut count_builder, query);

        let records = list_builder
            .build_query_as::<IssueRecord>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list issues for admin: {:?}", e);
                AppError::Database(e)
            })?;

        let total = count_builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count issues for admin: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((records.into_iter().map(Into::into).collect(), total))
    }
}

/// Append the WHERE clause shared by the list and count queries.
/// Both queries alias the issues table as `i`.
fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &AdminIssueQuery) {
    builder.push(" WHERE TRUE");

    if let Some(status) = query.status {
        builder.push(" AND i.status = ").push_bind(status);
    }
    if let Some(category) = query.category {
        builder.push(" AND i.category = ").push_bind(category);
    }
    if let Some(priority) = query.priority {
        builder.push(" AND i.priority = ").push_bind(priority);
    }
    if let Some(search) = query.search_term() {
        let term = format!("%{}%", search);
        builder
            .push(" AND (i.title ILIKE ")
            .push_bind(term.clone())
            .push(" OR i.description ILIKE ")
            .push_bind(term.clone())
            .push(" OR i.address ILIKE ")
            .push_bind(term)
            .push(")");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::issues::models::{IssueCategory, IssueStatus};

    fn filter_sql(query: &AdminIssueQuery) -> String {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM issues i");
        push_filters(&mut builder, query);
        builder.sql().to_string()
    }

    #[test]
    fn test_no_filters() {
        assert_eq!(
            filter_sql(&AdminIssueQuery::default()),
            "SELECT COUNT(*) FROM issues i WHERE TRUE"
        );
    }

    #[test]
    fn test_filters_are_bound_in_order() {
        let query = AdminIssueQuery {
            status: Some(IssueStatus::InProgress),
            category: Some(IssueCategory::Road),
            search: Some("  lubang ".to_string()),
            ..Default::default()
        };

        assert_eq!(
            filter_sql(&query),
            "SELECT COUNT(*) FROM issues i WHERE TRUE AND i.status = $1 AND i.category = $2 \
             AND (i.title ILIKE $3 OR i.description ILIKE $4 OR i.address ILIKE $5)"
        );
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let query = AdminIssueQuery {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(!filter_sql(&query).contains("ILIKE"));
    }
}
