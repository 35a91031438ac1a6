use chrono::NaiveDate;
use sqlx::PgPool;
use std::collections::HashMap;
use std::hash::Hash;

use crate::core::error::{AppError, Result};
use crate::features::dashboard::dtos::*;
use crate::features::issues::models::{IssueCategory, IssueStatus};

/// Service for public dashboard queries
pub struct DashboardService {
    pool: PgPool,
}

impl DashboardService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_summary(&self) -> Result<DashboardSummaryDto> {
        let (total_issues, total_upvotes, total_comments) =
            sqlx::query_as::<_, (i64, i64, i64)>(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM issues),
                    (SELECT COUNT(*) FROM issue_votes),
                    (SELECT COUNT(*) FROM comments)
                "#,
            )
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get summary totals: {:?}", e);
                AppError::Database(e)
            })?;

        let status_rows = sqlx::query_as::<_, (IssueStatus, i64)>(
            "SELECT status, COUNT(*) FROM issues GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count issues by status: {:?}", e);
            AppError::Database(e)
        })?;

        let category_rows = sqlx::query_as::<_, (IssueCategory, i64)>(
            "SELECT category, COUNT(*) FROM issues GROUP BY category",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count issues by category: {:?}", e);
            AppError::Database(e)
        })?;

        let timeline = sqlx::query_as::<_, (NaiveDate, i64)>(
            r#"
            SELECT (created_at AT TIME ZONE 'UTC')::date AS day, COUNT(*)
            FROM issues
            GROUP BY day
            ORDER BY day ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to build issue timeline: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(DashboardSummaryDto {
            total_issues,
            by_status: fill_counts(&IssueStatus::ALL, status_rows)
                .into_iter()
                .map(|(status, count)| StatusCountDto { status, count })
                .collect(),
            by_category: fill_counts(&IssueCategory::ALL, category_rows)
                .into_iter()
                .map(|(category, count)| CategoryCountDto { category, count })
                .collect(),
            total_upvotes,
            total_comments,
            timeline: timeline
                .into_iter()
                .map(|(date, count)| DailyCountDto { date, count })
                .collect(),
        })
    }
}

/// Counts for every key in `keys` order, zero where the query returned no row
fn fill_counts<K: Copy + Eq + Hash>(keys: &[K], rows: Vec<(K, i64)>) -> Vec<(K, i64)> {
    let counts: HashMap<K, i64> = rows.into_iter().collect();
    keys.iter()
        .map(|key| (*key, counts.get(key).copied().unwrap_or(0)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_counts_zero_fills_in_key_order() {
        let rows = vec![(IssueStatus::Resolved, 4), (IssueStatus::Open, 7)];
        let filled = fill_counts(&IssueStatus::ALL, rows);

        assert_eq!(filled.len(), IssueStatus::ALL.len());
        assert_eq!(filled[0], (IssueStatus::Open, 7));
        assert_eq!(
            filled
                .iter()
                .find(|(s, _)| *s == IssueStatus::Resolved)
                .map(|(_, c)| *c),
            Some(4)
        );
        assert_eq!(
            filled.iter().map(|(_, c)| c).sum::<i64>(),
            11,
            "missing statuses count as zero"
        );
    }
}
