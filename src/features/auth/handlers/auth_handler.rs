use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{
    AccessTokenDto, RefreshRequestDto, RegisterRequestDto, TokenPairDto, TokenRequestDto,
};
use crate::features::auth::guards::RequireAdmin;
use crate::features::auth::services::AuthService;
use crate::features::users::dtos::UserResponseDto;
use crate::features::users::models::UserRole;
use crate::shared::types::ApiResponse;
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use validator::Validate;

/// Register a new reporter account
#[utoipa::path(
    post,
    path = "/api/user/register",
    request_body = RegisterRequestDto,
    responses(
        (status = 201, description = "User registered successfully", body = ApiResponse<UserResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Username or email already registered")
    ),
    tag = "auth"
)]
pub async fn register_user(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<RegisterRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = service.register(dto, UserRole::Reporter).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(user), None, None)),
    ))
}

/// Register a new administrator (admin only)
#[utoipa::path(
    post,
    path = "/api/admin/register",
    request_body = RegisterRequestDto,
    responses(
        (status = 201, description = "Administrator registered successfully", body = ApiResponse<UserResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 409, description = "Username or email already registered")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn register_admin(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<RegisterRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = service.register(dto, UserRole::Admin).await?;
    tracing::info!("Admin '{}' registered admin '{}'", admin.username, user.username);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(user), None, None)),
    ))
}

/// Obtain an access/refresh token pair
#[utoipa::path(
    post,
    path = "/api/token",
    request_body = TokenRequestDto,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<TokenPairDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn obtain_token(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<TokenRequestDto>,
) -> Result<Json<ApiResponse<TokenPairDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let tokens = service.obtain_token(dto).await?;
    Ok(Json(ApiResponse::success(Some(tokens), None, None)))
}

/// Exchange a refresh token for a new access token
#[utoipa::path(
    post,
    path = "/api/token/refresh",
    request_body = RefreshRequestDto,
    responses(
        (status = 200, description = "Token refreshed successfully", body = ApiResponse<AccessTokenDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid or expired refresh token")
    ),
    tag = "auth"
)]
pub async fn refresh_token(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<RefreshRequestDto>,
) -> Result<Json<ApiResponse<AccessTokenDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let token = service.refresh(&dto.refresh)?;
    Ok(Json(ApiResponse::success(Some(token), None, None)))
}
