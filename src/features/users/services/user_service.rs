use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::password::hash_password;
use crate::features::users::dtos::UpdateProfileDto;
use crate::features::users::models::{CreateUser, User};
use crate::modules::storage::{object_key, ImageStore};
use crate::shared::constants::PROFILE_PICTURE_FOLDER;
use crate::shared::upload::UploadedImage;

const USER_COLUMNS: &str =
    "id, username, email, password_hash, role, profile_picture, date_joined, updated_at";

/// Map unique violations on the users table to 409 responses
fn handle_db_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.code() == Some(std::borrow::Cow::Borrowed("23505")) {
            return match db_err.constraint() {
                Some("users_email_key") => {
                    AppError::Conflict("A user with this email already exists".to_string())
                }
                _ => AppError::Conflict("A user with this username already exists".to_string()),
            };
        }
    }

    tracing::error!("User query failed: {:?}", e);
    AppError::Database(e)
}

/// Service for local user accounts
pub struct UserService {
    pool: PgPool,
    store: Arc<dyn ImageStore>,
}

impl UserService {
    pub fn new(pool: PgPool, store: Arc<dyn ImageStore>) -> Self {
        Self { pool, store }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<User> {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch user {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch user '{}': {:?}", username, e);
            AppError::Database(e)
        })
    }

    pub async fn create(&self, data: CreateUser) -> Result<User> {
        self.ensure_available(Some(&data.username), Some(&data.email), None)
            .await?;

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&data.username)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(data.role)
        .fetch_one(&self.pool)
        .await
        .map_err(handle_db_error)?;

        tracing::info!("Registered {} '{}'", user.role, user.username);
        Ok(user)
    }

    /// Apply a profile update. `None` fields are left as they are.
    ///
    /// The picture (if any) must already have passed `UploadedImage::validate_for_storage`.
    /// A replaced picture is removed from storage best-effort.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        dto: UpdateProfileDto,
        picture: Option<UploadedImage>,
    ) -> Result<User> {
        let current = self.find_by_id(user_id).await?;

        let username = dto.username.filter(|u| *u != current.username);
        let email = dto.email.filter(|e| *e != current.email);
        self.ensure_available(username.as_deref(), email.as_deref(), Some(user_id))
            .await?;

        let password_hash = match dto.password {
            Some(password) => Some(hash_password(&password).map_err(|e| {
                tracing::error!("Failed to hash password: {}", e);
                AppError::Internal("Failed to update password".to_string())
            })?),
            None => None,
        };

        let picture_url = match picture {
            Some(picture) => {
                let key = object_key(PROFILE_PICTURE_FOLDER, user_id, picture.extension());
                Some(
                    self.store
                        .put(&key, picture.bytes.to_vec(), &picture.content_type)
                        .await?,
                )
            }
            None => None,
        };

        let updated = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                profile_picture = COALESCE($5, profile_picture),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(user_id)
        .bind(&username)
        .bind(&email)
        .bind(&password_hash)
        .bind(&picture_url)
        .fetch_one(&self.pool)
        .await
        .map_err(handle_db_error);

        let updated = match updated {
            Ok(user) => user,
            Err(e) => {
                if let Some(url) = &picture_url {
                    self.remove_picture(url).await;
                }
                return Err(e);
            }
        };

        if picture_url.is_some() {
            if let Some(old) = &current.profile_picture {
                self.remove_picture(old).await;
            }
        }

        tracing::debug!("Updated profile of '{}'", updated.username);
        Ok(updated)
    }

    /// Reject a username or email already used by another account
    async fn ensure_available(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        exclude: Option<Uuid>,
    ) -> Result<()> {
        if let Some(username) = username {
            if self.is_taken("username", username, exclude).await? {
                return Err(AppError::Conflict(
                    "A user with this username already exists".to_string(),
                ));
            }
        }

        if let Some(email) = email {
            if self.is_taken("email", email, exclude).await? {
                return Err(AppError::Conflict(
                    "A user with this email already exists".to_string(),
                ));
            }
        }

        Ok(())
    }

    async fn is_taken(&self, column: &'static str, value: &str, exclude: Option<Uuid>) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(&format!(
            "SELECT EXISTS(SELECT 1 FROM users WHERE {} = $1 AND ($2::uuid IS NULL OR id <> $2))",
            column
        ))
        .bind(value)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check {} availability: {:?}", column, e);
            AppError::Database(e)
        })
    }

    async fn remove_picture(&self, url: &str) {
        if let Err(e) = self.store.delete_by_url(url).await {
            tracing::warn!("Failed to remove profile picture {}: {}", url, e);
        }
    }
}
