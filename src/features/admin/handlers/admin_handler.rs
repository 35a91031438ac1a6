use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::core::error::Result;
use crate::features::admin::dtos::AdminIssueQuery;
use crate::features::admin::services::AdminService;
use crate::features::auth::guards::RequireAdmin;
use crate::features::issues::dtos::IssueResponseDto;
use crate::shared::types::{ApiResponse, Meta};

/// List all issues with filters (paginated)
#[utoipa::path(
    get,
    path = "/api/admin/issues",
    params(AdminIssueQuery),
    responses(
        (status = 200, description = "List of issues", body = ApiResponse<Vec<IssueResponseDto>>),
        (status = 400, description = "Invalid filter value"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_issues(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<AdminService>>,
    Query(params): Query<AdminIssueQuery>,
) -> Result<Json<ApiResponse<Vec<IssueResponseDto>>>> {
    let (items, total) = service.list_issues(&params).await?;

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}
