#[cfg(test)]
use crate::features::auth::model::AuthenticatedUser;
#[cfg(test)]
use crate::features::users::models::UserRole;

#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};

#[cfg(test)]
pub fn create_reporter_user() -> AuthenticatedUser {
    AuthenticatedUser {
        id: uuid::Uuid::from_u128(0x0199_0000_0000_7000_8000_0000_0000_0001),
        username: "test_reporter".to_string(),
        role: UserRole::Reporter,
    }
}

#[cfg(test)]
pub fn create_admin_user() -> AuthenticatedUser {
    AuthenticatedUser {
        id: uuid::Uuid::from_u128(0x0199_0000_0000_7000_8000_0000_0000_0002),
        username: "test_admin".to_string(),
        role: UserRole::Admin,
    }
}

#[cfg(test)]
async fn inject_reporter_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_reporter_user());
    next.run(request).await
}

#[cfg(test)]
async fn inject_admin_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_admin_user());
    next.run(request).await
}

#[cfg(test)]
pub fn with_reporter_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_reporter_middleware))
}

#[cfg(test)]
pub fn with_admin_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_admin_middleware))
}
