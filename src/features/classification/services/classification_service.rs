use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;

use super::preprocess;
use super::scorer::{ClassificationError, ImageScorer};
use crate::core::config::ClassifierConfig;
use crate::features::classification::models::{ClassificationResult, LabelSet, ThresholdPolicy};

/// Image classification over a model loaded once at startup.
///
/// Classification is advisory: every failure path, including a missing model,
/// yields `(unknown, 0.0)` instead of an error.
pub struct ClassificationService {
    scorer: Option<Arc<dyn ImageScorer>>,
    labels: LabelSet,
    input_size: u32,
    timeout: Duration,
}

impl ClassificationService {
    pub fn new(
        scorer: Option<Arc<dyn ImageScorer>>,
        labels: LabelSet,
        input_size: u32,
        timeout: Duration,
    ) -> Self {
        Self {
            scorer,
            labels,
            input_size,
            timeout,
        }
    }

    /// Load labels and model. A model that cannot be loaded leaves the service
    /// unavailable rather than failing startup.
    pub fn load(config: &ClassifierConfig) -> Self {
        let labels = LabelSet::load(&config.labels_path);
        let scorer = load_scorer(config);

        if scorer.is_none() {
            tracing::warn!("Issue classifier unavailable, every image will be classified as unknown");
        }

        Self::new(scorer, labels, config.input_size, config.timeout)
    }

    pub fn is_available(&self) -> bool {
        self.scorer.is_some()
    }

    pub async fn classify(&self, bytes: Bytes, policy: &ThresholdPolicy) -> ClassificationResult {
        let Some(scorer) = self.scorer.clone() else {
            tracing::debug!("Classifier unavailable, returning unknown");
            return ClassificationResult::unknown();
        };

        let size = self.input_size;
        let task = tokio::task::spawn_blocking(move || -> Result<Vec<f32>, ClassificationError> {
            let input = preprocess::to_model_input(&bytes, size)?;
            scorer.score(input)
        });

        let scores = match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(Ok(scores))) => scores,
            Ok(Ok(Err(e))) => {
                tracing::warn!("Classification failed: {}", e);
                return ClassificationResult::unknown();
            }
            Ok(Err(e)) => {
                tracing::warn!("Classification task panicked: {}", e);
                return ClassificationResult::unknown();
            }
            Err(_) => {
                tracing::warn!(
                    "Classification exceeded {}ms budget",
                    self.timeout.as_millis()
                );
                return ClassificationResult::unknown();
            }
        };

        match self.decide(&scores, policy) {
            Ok(result) => {
                tracing::info!(
                    category = %result.category,
                    confidence = result.confidence,
                    "Classified issue image"
                );
                result
            }
            Err(e) => {
                tracing::warn!("Classification failed: {}", e);
                ClassificationResult::unknown()
            }
        }
    }

    /// Apply the policy to the arg-max of `scores`
    fn decide(
        &self,
        scores: &[f32],
        policy: &ThresholdPolicy,
    ) -> Result<ClassificationResult, ClassificationError> {
        let (index, confidence) = scores
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, score)| !score.is_nan())
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .ok_or_else(|| ClassificationError::Scoring("model returned no scores".to_string()))?;

        let label = self.labels.get(index).ok_or_else(|| {
            ClassificationError::Scoring(format!("model output {} has no label", index))
        })?;

        Ok(policy.decide(label, confidence))
    }
}

#[cfg(feature = "onnx")]
fn load_scorer(config: &ClassifierConfig) -> Option<Arc<dyn ImageScorer>> {
    match super::scorer::OnnxScorer::load(&config.model_path) {
        Ok(scorer) => Some(Arc::new(scorer)),
        Err(e) => {
            tracing::error!("{}", e);
            None
        }
    }
}

#[cfg(not(feature = "onnx"))]
fn load_scorer(config: &ClassifierConfig) -> Option<Arc<dyn ImageScorer>> {
    tracing::warn!(
        model = %config.model_path.display(),
        "Built without the `onnx` feature, model not loaded; every issue image will be \
         classified as unknown until the server is rebuilt with `--features onnx`"
    );
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::classification::models::PredictedCategory;
    use crate::features::classification::services::scorer::ImageTensor;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns fixed scores and counts how often it was asked
    struct FixedScorer {
        scores: Vec<f32>,
        calls: AtomicUsize,
    }

    impl FixedScorer {
        fn new(scores: Vec<f32>) -> Arc<Self> {
            Arc::new(Self {
                scores,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl ImageScorer for FixedScorer {
        fn score(&self, input: ImageTensor) -> Result<Vec<f32>, ClassificationError> {
            assert_eq!(input.shape, [1, 8, 8, 3]);
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.scores.clone())
        }
    }

    struct FailingScorer;

    impl ImageScorer for FailingScorer {
        fn score(&self, _input: ImageTensor) -> Result<Vec<f32>, ClassificationError> {
            Err(ClassificationError::Scoring("boom".to_string()))
        }
    }

    struct SlowScorer;

    impl ImageScorer for SlowScorer {
        fn score(&self, _input: ImageTensor) -> Result<Vec<f32>, ClassificationError> {
            std::thread::sleep(Duration::from_millis(300));
            Ok(vec![0.0, 0.0, 0.0, 1.0, 0.0])
        }
    }

    fn service(scorer: Option<Arc<dyn ImageScorer>>) -> ClassificationService {
        ClassificationService::new(scorer, LabelSet::default(), 8, Duration::from_secs(5))
    }

    fn policy() -> ThresholdPolicy {
        ThresholdPolicy::new(0.5, 0.9).unwrap()
    }

    fn photo() -> Bytes {
        let img = RgbImage::from_pixel(16, 12, Rgb([120, 80, 40]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        Bytes::from(out.into_inner())
    }

    #[tokio::test]
    async fn test_confident_prediction_is_kept() {
        // electricity, garbage, other, road, water
        let scorer = FixedScorer::new(vec![0.05, 0.1, 0.05, 0.7, 0.1]);
        let result = service(Some(scorer)).classify(photo(), &policy()).await;

        assert_eq!(result.category, PredictedCategory::Road);
        assert_eq!(result.confidence, 0.7);
    }

    #[tokio::test]
    async fn test_low_confidence_other_is_unknown() {
        let scorer = FixedScorer::new(vec![0.05, 0.05, 0.8, 0.05, 0.05]);
        let result = service(Some(scorer)).classify(photo(), &policy()).await;

        assert_eq!(result, ClassificationResult::unknown());
    }

    #[tokio::test]
    async fn test_classification_is_idempotent() {
        let scorer = FixedScorer::new(vec![0.6, 0.1, 0.1, 0.1, 0.1]);
        let service = service(Some(scorer.clone()));

        let first = service.classify(photo(), &policy()).await;
        let second = service.classify(photo(), &policy()).await;

        assert_eq!(first, second);
        assert_eq!(first.category, PredictedCategory::Electricity);
        assert_eq!(scorer.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unavailable_model_yields_unknown() {
        let service = service(None);

        assert!(!service.is_available());
        assert!(service.classify(photo(), &policy()).await.is_unknown());
    }

    #[tokio::test]
    async fn test_scoring_error_yields_unknown() {
        let result = service(Some(Arc::new(FailingScorer)))
            .classify(photo(), &policy())
            .await;
        assert_eq!(result, ClassificationResult::unknown());
    }

    #[tokio::test]
    async fn test_undecodable_image_yields_unknown() {
        let scorer = FixedScorer::new(vec![1.0, 0.0, 0.0, 0.0, 0.0]);
        let service = service(Some(scorer.clone()));

        let result = service
            .classify(Bytes::from_static(b"\xff\xd8 truncated"), &policy())
            .await;

        assert!(result.is_unknown());
        assert_eq!(scorer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_output_without_label_yields_unknown() {
        let scorer = FixedScorer::new(vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.99]);
        let result = service(Some(scorer)).classify(photo(), &policy()).await;
        assert!(result.is_unknown());
    }

    #[tokio::test]
    async fn test_empty_scores_yield_unknown() {
        let scorer = FixedScorer::new(vec![]);
        let result = service(Some(scorer)).classify(photo(), &policy()).await;
        assert!(result.is_unknown());
    }

    #[cfg(not(feature = "onnx"))]
    #[tokio::test]
    async fn test_load_without_onnx_feature_is_unavailable() {
        let config = ClassifierConfig {
            model_path: "models/issue_classifier.onnx".into(),
            labels_path: "models/does_not_exist.json".into(),
            input_size: 8,
            timeout: Duration::from_secs(1),
            threshold: 0.5,
            other_threshold: 0.6,
        };

        let service = ClassificationService::load(&config);

        assert!(!service.is_available());
        assert!(service.classify(photo(), &policy()).await.is_unknown());
    }

    #[tokio::test]
    async fn test_timeout_yields_unknown() {
        let service = ClassificationService::new(
            Some(Arc::new(SlowScorer)),
            LabelSet::default(),
            8,
            Duration::from_millis(20),
        );

        assert!(service.classify(photo(), &policy()).await.is_unknown());
    }
}
