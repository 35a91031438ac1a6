use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{AccessTokenDto, RegisterRequestDto, TokenPairDto, TokenRequestDto};
use crate::features::auth::password::{hash_password, verify_password};
use crate::features::auth::services::token_service::TokenService;
use crate::features::users::dtos::UserResponseDto;
use crate::features::users::models::{CreateUser, UserRole};
use crate::features::users::services::UserService;

/// Service for authentication operations (register, token issue, refresh)
pub struct AuthService {
    users: Arc<UserService>,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(users: Arc<UserService>, tokens: Arc<TokenService>) -> Self {
        Self { users, tokens }
    }

    /// Register a new account with the given role
    pub async fn register(&self, dto: RegisterRequestDto, role: UserRole) -> Result<UserResponseDto> {
        let password_hash = hash_password(&dto.password).map_err(|e| {
            tracing::error!("Failed to hash password: {}", e);
            AppError::Internal("Failed to register user".to_string())
        })?;

        let user = self
            .users
            .create(CreateUser {
                username: dto.username.trim().to_string(),
                email: dto.email.trim().to_string(),
                password_hash,
                role,
            })
            .await?;

        Ok(user.into())
    }

    /// Exchange username and password for an access/refresh pair
    pub async fn obtain_token(&self, dto: TokenRequestDto) -> Result<TokenPairDto> {
        let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

        let user = self
            .users
            .find_by_username(dto.username.trim())
            .await?
            .ok_or_else(invalid)?;

        let valid = verify_password(&dto.password, &user.password_hash).map_err(|e| {
            tracing::error!("Stored password hash for '{}' is unreadable: {}", user.username, e);
            AppError::Internal("Failed to verify credentials".to_string())
        })?;

        if !valid {
            tracing::debug!("Rejected login for '{}'", user.username);
            return Err(invalid());
        }

        Ok(self.tokens.issue_pair(&user)?.into())
    }

    pub fn refresh(&self, refresh_token: &str) -> Result<AccessTokenDto> {
        let access = self.tokens.refresh(refresh_token)?;
        Ok(AccessTokenDto { access })
    }
}
