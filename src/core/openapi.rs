use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::admin::{dtos as admin_dtos, handlers as admin_handlers};
use crate::features::auth;
use crate::features::classification::{
    dtos as classification_dtos, handlers as classification_handlers,
    models as classification_models,
};
use crate::features::comments::{dtos as comments_dtos, handlers as comments_handlers};
use crate::features::dashboard::{dtos as dashboard_dtos, handlers as dashboard_handlers};
use crate::features::issues::{
    dtos as issues_dtos, handlers as issues_handlers, models as issues_models,
};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers, models as users_models};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::register_user,
        auth::handlers::register_admin,
        auth::handlers::obtain_token,
        auth::handlers::refresh_token,
        // Users
        users_handlers::get_user_info,
        users_handlers::update_user,
        // Classification
        classification_handlers::predict_image,
        // Issues
        issues_handlers::report_issue,
        issues_handlers::my_issues,
        issues_handlers::public_issues,
        issues_handlers::recent_activity,
        issues_handlers::get_issue_detail,
        issues_handlers::update_issue,
        issues_handlers::delete_issue,
        // Votes
        issues_handlers::upvote_issue,
        issues_handlers::remove_vote,
        issues_handlers::user_voted_issues,
        // Comments
        comments_handlers::list_comments,
        comments_handlers::create_comment,
        comments_handlers::update_comment,
        comments_handlers::delete_comment,
        comments_handlers::my_comments,
        // Admin
        admin_handlers::list_issues,
        // Dashboard (public)
        dashboard_handlers::get_summary,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth::model::AuthenticatedUser,
            auth::dtos::RegisterRequestDto,
            auth::dtos::TokenRequestDto,
            auth::dtos::RefreshRequestDto,
            ApiResponse<auth::dtos::TokenPairDto>,
            ApiResponse<auth::dtos::AccessTokenDto>,
            // Users
            users_models::UserRole,
            users_dtos::UpdateProfileFormDto,
            ApiResponse<users_dtos::UserResponseDto>,
            // Classification
            classification_models::PredictedCategory,
            classification_dtos::PredictImageDto,
            ApiResponse<classification_dtos::PredictionResponseDto>,
            // Issues
            issues_models::IssueCategory,
            issues_models::IssuePriority,
            issues_models::IssueStatus,
            issues_dtos::ReportIssueFormDto,
            issues_dtos::UpdateIssueDto,
            issues_dtos::ClassificationSource,
            issues_dtos::IssueClassificationDto,
            ApiResponse<issues_dtos::CreatedIssueDto>,
            ApiResponse<issues_dtos::IssueDetailDto>,
            ApiResponse<issues_dtos::IssueResponseDto>,
            ApiResponse<Vec<issues_dtos::IssueResponseDto>>,
            ApiResponse<Vec<issues_dtos::RecentActivityDto>>,
            // Votes
            ApiResponse<issues_dtos::VoteResponseDto>,
            ApiResponse<Vec<issues_dtos::VotedIssueDto>>,
            // Comments
            comments_dtos::CommentTextDto,
            ApiResponse<comments_dtos::CommentResponseDto>,
            ApiResponse<Vec<comments_dtos::CommentResponseDto>>,
            ApiResponse<comments_dtos::MyCommentsDto>,
            // Admin
            admin_dtos::SortOrder,
            // Dashboard
            ApiResponse<dashboard_dtos::DashboardSummaryDto>,
        )
    ),
    tags(
        (name = "auth", description = "Registration and JWT token endpoints"),
        (name = "users", description = "User profile management"),
        (name = "classification", description = "Issue image category prediction"),
        (name = "issues", description = "Civic issue reports"),
        (name = "votes", description = "Issue upvotes"),
        (name = "comments", description = "Issue comments"),
        (name = "admin", description = "Admin triage endpoints (admin only)"),
        (name = "dashboard", description = "Public community statistics"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "CivicLink API",
        version = "0.1.0",
        description = "API documentation for CivicLink",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_issue_routes_and_bearer_scheme() {
        let doc = ApiDoc::openapi();

        for path in [
            "/api/report",
            "/api/predict",
            "/api/issue/{id}/upvote",
            "/api/comment/{id}/delete",
            "/api/admin/issues",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }

    #[test]
    fn test_info_modifier_overrides_title() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Staging".to_string(),
            version: "9.9.9".to_string(),
            description: "staging build".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Staging");
        assert_eq!(doc.info.version, "9.9.9");
    }
}
