use axum::{
    extract::{Multipart, State},
    Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::dtos::{UpdateProfileDto, UpdateProfileFormDto, UserResponseDto};
use crate::features::users::services::UserService;
use crate::shared::types::ApiResponse;
use crate::shared::upload::UploadedImage;

#[utoipa::path(
    get,
    path = "/api/user/info",
    responses(
        (status = 200, description = "Profile retrieved successfully", body = ApiResponse<UserResponseDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_user_info(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    let profile = service.find_by_id(user.id).await?;
    Ok(Json(ApiResponse::success(Some(profile.into()), None, None)))
}

#[utoipa::path(
    put,
    path = "/api/user/update",
    request_body(
        content = UpdateProfileFormDto,
        content_type = "multipart/form-data",
    ),
    responses(
        (status = 200, description = "Profile updated successfully", body = ApiResponse<UserResponseDto>),
        (status = 400, description = "Validation error, invalid or animated image"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Username or email already taken")
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_user(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    let mut dto = UpdateProfileDto::default();
    let mut picture: Option<UploadedImage> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read multipart data: {}", e)))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name == "profile_picture" {
            let upload = UploadedImage::from_field(field).await?;
            if !upload.bytes.is_empty() {
                picture = Some(upload);
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read {}: {}", field_name, e)))?;

        match field_name.as_str() {
            "username" => dto.username = non_blank(&value),
            "email" => dto.email = non_blank(&value),
            // Passwords are taken verbatim; only an empty field means "unchanged"
            "password" => dto.password = Some(value).filter(|p| !p.trim().is_empty()),
            _ => tracing::debug!("Ignoring unknown field: {}", field_name),
        }
    }

    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if let Some(picture) = &picture {
        picture.validate_for_storage()?;
    }

    let updated = service.update_profile(user.id, dto, picture).await?;
    Ok(Json(ApiResponse::success(
        Some(updated.into()),
        Some("Profile updated successfully".to_string()),
        None,
    )))
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank("  alice "), Some("alice".to_string()));
        assert_eq!(non_blank("   "), None);
        assert_eq!(non_blank(""), None);
    }
}
