use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::users::models::{User, UserRole};

/// Public view of a user account
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponseDto {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub date_joined: DateTime<Utc>,
    /// Public URL of the profile picture
    pub profile_picture: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponseDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            date_joined: user.date_joined,
            profile_picture: user.profile_picture,
            updated_at: user.updated_at,
        }
    }
}

/// Multipart form for updating the profile (Swagger UI documentation only)
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UpdateProfileFormDto {
    pub username: Option<String>,
    pub email: Option<String>,
    /// Ignored when blank
    pub password: Option<String>,
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub profile_picture: Option<String>,
}

/// Text fields of the profile form; blank fields are left unchanged
#[derive(Debug, Default, Validate)]
pub struct UpdateProfileDto {
    #[validate(regex(
        path = "*crate::shared::validation::USERNAME_REGEX",
        message = "Username may contain up to 150 letters, digits and @/./+/-/_ characters"
    ))]
    pub username: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
}
