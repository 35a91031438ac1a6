use crate::features::users::handlers;
use crate::features::users::services::UserService;
use crate::shared::constants::MAX_IMAGE_SIZE;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, put},
    Router,
};
use std::sync::Arc;

pub fn routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/api/user/info", get(handlers::get_user_info))
        .route(
            "/api/user/update",
            put(handlers::update_user)
                .patch(handlers::update_user)
                .layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE + 1024 * 1024)),
        )
        .with_state(service)
}
