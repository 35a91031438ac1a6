use axum::{extract::DefaultBodyLimit, routing::post, Router};
use std::sync::Arc;

use crate::features::classification::handlers::predict_image;
use crate::features::classification::models::ThresholdPolicy;
use crate::features::classification::services::ClassificationService;
use crate::shared::constants::MAX_IMAGE_SIZE;

#[derive(Clone)]
pub struct ClassificationState {
    pub classifier: Arc<ClassificationService>,
    pub policy: ThresholdPolicy,
}

/// Protected classification routes
pub fn routes(state: ClassificationState) -> Router {
    Router::new()
        .route(
            "/api/predict",
            post(predict_image).layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE + 1024 * 1024)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::classification::models::LabelSet;
    use crate::features::classification::services::scorer::{
        ClassificationError, ImageScorer, ImageTensor,
    };
    use crate::shared::test_helpers::with_reporter_auth;
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;
    use std::time::Duration;

    struct RoadScorer;

    impl ImageScorer for RoadScorer {
        fn score(&self, _input: ImageTensor) -> Result<Vec<f32>, ClassificationError> {
            // electricity, garbage, other, road, water
            Ok(vec![0.05, 0.05, 0.05, 0.8, 0.05])
        }
    }

    fn server(scorer: Option<Arc<dyn ImageScorer>>) -> TestServer {
        let state = ClassificationState {
            classifier: Arc::new(ClassificationService::new(
                scorer,
                LabelSet::default(),
                32,
                Duration::from_secs(5),
            )),
            policy: ThresholdPolicy::new(0.5, 0.6).unwrap(),
        };
        TestServer::new(with_reporter_auth(routes(state))).unwrap()
    }

    fn png() -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 30, Rgb([90, 90, 90])))
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn form(bytes: Vec<u8>, mime: &str) -> MultipartForm {
        MultipartForm::new().add_part(
            "image",
            Part::bytes(bytes).file_name("photo").mime_type(mime),
        )
    }

    #[tokio::test]
    async fn test_predict_returns_category() {
        let response = server(Some(Arc::new(RoadScorer)))
            .post("/api/predict")
            .multipart(form(png(), "image/png"))
            .await;

        response.assert_status_ok();
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["data"]["category"], "road");
        assert_eq!(body["data"]["is_unknown"], false);
        assert!(body["data"].get("reason").is_none());
    }

    #[tokio::test]
    async fn test_predict_without_model_is_unknown() {
        let response = server(None)
            .post("/api/predict")
            .multipart(form(png(), "image/png"))
            .await;

        response.assert_status_ok();
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["data"]["category"], "unknown");
        assert_eq!(body["data"]["confidence"], 0.0);
        assert_eq!(body["data"]["is_unknown"], true);
    }

    #[tokio::test]
    async fn test_predict_flags_animated_image() {
        let response = server(Some(Arc::new(RoadScorer)))
            .post("/api/predict")
            .multipart(form(b"GIF89a\x01\x00\x01\x00\x00\x00".to_vec(), "image/gif"))
            .await;

        response.assert_status_ok();
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["data"]["category"], "unknown");
        assert_eq!(body["data"]["is_unknown"], true);
        assert_eq!(body["data"]["reason"], "animated_image");
    }

    #[tokio::test]
    async fn test_predict_requires_image() {
        let response = server(Some(Arc::new(RoadScorer)))
            .post("/api/predict")
            .multipart(MultipartForm::new().add_text("note", "no image here"))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_predict_rejects_non_image() {
        let response = server(Some(Arc::new(RoadScorer)))
            .post("/api/predict")
            .multipart(form(b"%PDF-1.7".to_vec(), "application/pdf"))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
