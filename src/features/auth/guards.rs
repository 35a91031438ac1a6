//! Role-based authorization guards.
//!
//! Two roles exist: `reporter` (every registered citizen) and `admin`, which can
//! triage and edit any issue.

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Guard for checking if user is an administrator.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireAdmin(user): RequireAdmin) { ... }
/// ```
pub struct RequireAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        Ok(RequireAdmin(user.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{with_admin_auth, with_reporter_auth};
    use axum::{http::StatusCode, routing::get, Router};
    use axum_test::TestServer;

    async fn admin_only(RequireAdmin(user): RequireAdmin) -> String {
        user.username
    }

    fn app() -> Router {
        Router::new().route("/admin", get(admin_only))
    }

    #[tokio::test]
    async fn test_admin_passes() {
        let server = TestServer::new(with_admin_auth(app())).unwrap();
        let response = server.get("/admin").await;
        response.assert_status_ok();
        response.assert_text("test_admin");
    }

    #[tokio::test]
    async fn test_reporter_is_forbidden() {
        let server = TestServer::new(with_reporter_auth(app())).unwrap();
        server
            .get("/admin")
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_anonymous_is_unauthorized() {
        let server = TestServer::new(app()).unwrap();
        server
            .get("/admin")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
