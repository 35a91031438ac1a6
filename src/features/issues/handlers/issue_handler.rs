use axum::{
    extract::{multipart::Field, Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::issues::dtos::{
    CreateIssueDto, CreatedIssueDto, IssueDetailDto, IssueResponseDto, RecentActivityDto,
    ReportIssueFormDto, UpdateIssueDto,
};
use crate::features::issues::services::IssueService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};
use crate::shared::upload::UploadedImage;

/// Report a new issue
///
/// Accepts multipart/form-data. Animated images are rejected with
/// `errors = ["animated_image"]` before anything is classified or stored.
#[utoipa::path(
    post,
    path = "/api/report",
    tag = "issues",
    request_body(
        content = ReportIssueFormDto,
        content_type = "multipart/form-data",
    ),
    responses(
        (status = 201, description = "Issue reported", body = ApiResponse<CreatedIssueDto>),
        (status = 400, description = "Validation error, invalid or animated image"),
        (status = 401, description = "Authentication required")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn report_issue(
    user: AuthenticatedUser,
    State(service): State<Arc<IssueService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<CreatedIssueDto>>)> {
    let mut dto = CreateIssueDto::default();
    let mut image: Option<UploadedImage> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "image" => {
                let upload = UploadedImage::from_field(field).await?;
                // Browsers send an empty part when no file is picked
                if !upload.bytes.is_empty() {
                    image = Some(upload);
                }
            }
            "title" => dto.title = read_text(field).await?.trim().to_string(),
            "description" => dto.description = read_text(field).await?.trim().to_string(),
            "address" => dto.address = read_text(field).await?.trim().to_string(),
            "category" => {
                let text = read_text(field).await?;
                let text = text.trim();
                // `unknown` is what a declined pre-check reports; treat it as no hint
                if !text.is_empty() && !text.eq_ignore_ascii_case("unknown") {
                    dto.category = Some(text.parse().map_err(AppError::Validation)?);
                }
            }
            "priority" => {
                let text = read_text(field).await?;
                if !text.trim().is_empty() {
                    dto.priority = Some(text.parse().map_err(AppError::Validation)?);
                }
            }
            "confidence" => {
                // Unparseable confidence is ignored, which sends the image to the model
                dto.confidence = read_text(field).await?.trim().parse::<f32>().ok();
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if let Some(image) = &image {
        image.validate_for_storage()?;
    }

    let created = service.create(&user, dto, image).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(created), None, None)),
    ))
}

async fn read_text(field: Field<'_>) -> Result<String> {
    let name = field.name().unwrap_or("").to_string();
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read {} field: {}", name, e)))
}

/// List the caller's own issues
#[utoipa::path(
    get,
    path = "/api/my-issues",
    tag = "issues",
    responses(
        (status = 200, description = "Issues retrieved", body = ApiResponse<Vec<IssueResponseDto>>),
        (status = 401, description = "Authentication required")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn my_issues(
    user: AuthenticatedUser,
    State(service): State<Arc<IssueService>>,
) -> Result<Json<ApiResponse<Vec<IssueResponseDto>>>> {
    let issues = service.list_for_reporter(user.id).await?;
    let total = issues.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(issues),
        None,
        Some(Meta { total }),
    )))
}

/// Community feed of all issues (no authentication)
#[utoipa::path(
    get,
    path = "/api/public-issues",
    tag = "issues",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Issues retrieved", body = ApiResponse<Vec<IssueResponseDto>>)
    )
)]
pub async fn public_issues(
    State(service): State<Arc<IssueService>>,
    Query(params): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<IssueResponseDto>>>> {
    let (issues, total) = service.list_public(&params).await?;
    Ok(Json(ApiResponse::success(
        Some(issues),
        None,
        Some(Meta { total }),
    )))
}

/// Five most recently reported issues (no authentication)
#[utoipa::path(
    get,
    path = "/api/recent-activity",
    tag = "issues",
    responses(
        (status = 200, description = "Recent issues retrieved", body = ApiResponse<Vec<RecentActivityDto>>)
    )
)]
pub async fn recent_activity(
    State(service): State<Arc<IssueService>>,
) -> Result<Json<ApiResponse<Vec<RecentActivityDto>>>> {
    let issues = service.recent_activity().await?;
    Ok(Json(ApiResponse::success(Some(issues), None, None)))
}

/// Issue detail with vote state for the caller
#[utoipa::path(
    get,
    path = "/api/issue/{id}",
    tag = "issues",
    params(
        ("id" = Uuid, Path, description = "Issue ID")
    ),
    responses(
        (status = 200, description = "Issue retrieved", body = ApiResponse<IssueDetailDto>),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Issue not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_issue_detail(
    user: AuthenticatedUser,
    State(service): State<Arc<IssueService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<IssueDetailDto>>> {
    let issue = service.get_detail(id, user.id).await?;
    Ok(Json(ApiResponse::success(Some(issue), None, None)))
}

/// Update an issue (admins: any issue, reporters: their own)
#[utoipa::path(
    put,
    path = "/api/issue/{id}/update",
    tag = "issues",
    params(
        ("id" = Uuid, Path, description = "Issue ID")
    ),
    request_body = UpdateIssueDto,
    responses(
        (status = 200, description = "Issue updated", body = ApiResponse<IssueResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Issue not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_issue(
    user: AuthenticatedUser,
    State(service): State<Arc<IssueService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateIssueDto>,
) -> Result<Json<ApiResponse<IssueResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let issue = service.update(id, &user, dto).await?;
    Ok(Json(ApiResponse::success(Some(issue), None, None)))
}

/// Delete one of the caller's own issues
#[utoipa::path(
    delete,
    path = "/api/issue/{id}/delete",
    tag = "issues",
    params(
        ("id" = Uuid, Path, description = "Issue ID")
    ),
    responses(
        (status = 204, description = "Issue deleted"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Issue not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_issue(
    user: AuthenticatedUser,
    State(service): State<Arc<IssueService>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    service.delete(id, &user).await?;
    Ok(StatusCode::NO_CONTENT)
}
