use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::classification::dtos::{PredictImageDto, PredictionResponseDto};
use crate::features::classification::routes::ClassificationState;
use crate::shared::types::ApiResponse;
use crate::shared::upload::UploadedImage;

/// Classify an image without creating an issue
///
/// Animated images are not classified; they come back as `unknown` with
/// `reason = "animated_image"`.
#[utoipa::path(
    post,
    path = "/api/predict",
    tag = "classification",
    request_body(
        content = PredictImageDto,
        content_type = "multipart/form-data",
    ),
    responses(
        (status = 200, description = "Prediction computed", body = ApiResponse<PredictionResponseDto>),
        (status = 400, description = "Missing or invalid image"),
        (status = 401, description = "Authentication required")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn predict_image(
    user: AuthenticatedUser,
    State(state): State<ClassificationState>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<PredictionResponseDto>>> {
    let mut image: Option<UploadedImage> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        if field.name() == Some("image") {
            image = Some(UploadedImage::from_field(field).await?);
        }
    }

    let image = image.ok_or_else(|| AppError::BadRequest("No image provided".to_string()))?;
    image.validate()?;

    if image.is_animated() {
        debug!("Prediction skipped for animated upload from {}", user.username);
        return Ok(Json(ApiResponse::success(
            Some(PredictionResponseDto::animated()),
            Some("Animated images are not allowed".to_string()),
            None,
        )));
    }

    let result = state.classifier.classify(image.bytes, &state.policy).await;

    Ok(Json(ApiResponse::success(Some(result.into()), None, None)))
}
