use axum::{
    routing::{delete, get, put},
    Router,
};
use std::sync::Arc;

use crate::features::comments::handlers;
use crate::features::comments::services::CommentService;

pub fn routes(service: Arc<CommentService>) -> Router {
    Router::new()
        .route(
            "/api/issue/{id}/comments",
            get(handlers::list_comments).post(handlers::create_comment),
        )
        .route(
            "/api/comment/{id}/update",
            put(handlers::update_comment).patch(handlers::update_comment),
        )
        .route("/api/comment/{id}/delete", delete(handlers::delete_comment))
        .route("/api/my-comments", get(handlers::my_comments))
        .with_state(service)
}
