use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::classification::models::{ClassificationResult, PredictedCategory};

/// Multipart form for image prediction (Swagger UI documentation only)
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct PredictImageDto {
    /// Photo of the issue
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub image: String,
}

/// Response DTO for image prediction
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PredictionResponseDto {
    pub category: PredictedCategory,
    pub confidence: f32,
    pub is_unknown: bool,
    /// Why the image was not classified, when it was refused up front
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<ClassificationResult> for PredictionResponseDto {
    fn from(result: ClassificationResult) -> Self {
        Self {
            category: result.category,
            confidence: result.confidence,
            is_unknown: result.is_unknown(),
            reason: None,
        }
    }
}

impl PredictionResponseDto {
    pub fn animated() -> Self {
        Self {
            reason: Some("animated_image".to_string()),
            ..ClassificationResult::unknown().into()
        }
    }
}
