use thiserror::Error;

use super::classification::{ClassificationResult, PredictedCategory};

#[derive(Debug, Error, PartialEq)]
pub enum PolicyError {
    #[error("{name} must be between 0 and 1, got {value}")]
    OutOfRange { name: &'static str, value: f32 },
}

/// Confidence thresholds that turn a raw arg-max into a committed category.
///
/// `other` is held to its own, usually stricter, threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdPolicy {
    threshold: f32,
    other_threshold: f32,
}

impl ThresholdPolicy {
    pub fn new(threshold: f32, other_threshold: f32) -> Result<Self, PolicyError> {
        check_range("threshold", threshold)?;
        check_range("other_threshold", other_threshold)?;

        Ok(Self {
            threshold,
            other_threshold,
        })
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn other_threshold(&self) -> f32 {
        self.other_threshold
    }

    /// Whether `confidence` is high enough to commit to `category`.
    /// Values outside [0, 1] (NaN included) are never accepted.
    pub fn accepts(&self, category: PredictedCategory, confidence: f32) -> bool {
        if !(0.0..=1.0).contains(&confidence) {
            return false;
        }

        match category {
            PredictedCategory::Unknown => false,
            PredictedCategory::Other => confidence >= self.other_threshold,
            _ => confidence >= self.threshold,
        }
    }

    /// Decide on the arg-max label and its probability.
    ///
    /// Labels outside the category enum, and anything below threshold, become
    /// `(unknown, 0.0)`.
    pub fn decide(&self, label: &str, confidence: f32) -> ClassificationResult {
        let Ok(category) = label.parse::<PredictedCategory>() else {
            tracing::warn!("Model produced unmapped label '{}'", label);
            return ClassificationResult::unknown();
        };

        if !self.accepts(category, confidence) {
            return ClassificationResult::unknown();
        }

        ClassificationResult {
            category,
            confidence,
        }
    }
}

fn check_range(name: &'static str, value: f32) -> Result<(), PolicyError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(PolicyError::OutOfRange { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> ThresholdPolicy {
        ThresholdPolicy::new(0.5, 0.9).unwrap()
    }

    #[test]
    fn test_other_above_other_threshold_is_kept() {
        let result = policy().decide("other", 0.95);
        assert_eq!(result.category, PredictedCategory::Other);
        assert_eq!(result.confidence, 0.95);
    }

    #[test]
    fn test_other_below_other_threshold_is_unknown() {
        // Clears the general threshold but not the stricter one for `other`
        assert_eq!(policy().decide("other", 0.7), ClassificationResult::unknown());
    }

    #[test]
    fn test_category_above_threshold_is_kept() {
        let result = policy().decide("road", 0.62);
        assert_eq!(result.category, PredictedCategory::Road);
        assert_eq!(result.confidence, 0.62);
    }

    #[test]
    fn test_category_below_threshold_is_unknown() {
        assert_eq!(policy().decide("water", 0.49), ClassificationResult::unknown());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert_eq!(policy().decide("garbage", 0.5).category, PredictedCategory::Garbage);
        assert_eq!(policy().decide("other", 0.9).category, PredictedCategory::Other);
    }

    #[test]
    fn test_unmapped_label_is_unknown() {
        assert_eq!(policy().decide("pothole", 0.99), ClassificationResult::unknown());
        assert_eq!(policy().decide("unknown", 0.99), ClassificationResult::unknown());
    }

    #[test]
    fn test_invalid_confidence_is_unknown() {
        assert_eq!(policy().decide("road", 1.5), ClassificationResult::unknown());
        assert_eq!(policy().decide("road", f32::NAN), ClassificationResult::unknown());
    }

    #[test]
    fn test_rejects_out_of_range_thresholds() {
        assert!(ThresholdPolicy::new(1.1, 0.9).is_err());
        assert_eq!(
            ThresholdPolicy::new(0.5, -0.2),
            Err(PolicyError::OutOfRange {
                name: "other_threshold",
                value: -0.2
            })
        );
        assert!(ThresholdPolicy::new(f32::NAN, 0.5).is_err());
    }

    #[test]
    fn test_accepts_client_precheck() {
        let policy = ThresholdPolicy::new(0.5, 0.6).unwrap();
        assert!(policy.accepts(PredictedCategory::Other, 0.6));
        assert!(!policy.accepts(PredictedCategory::Other, 0.55));
        assert!(policy.accepts(PredictedCategory::Electricity, 0.55));
        assert!(!policy.accepts(PredictedCategory::Unknown, 1.0));
    }

    #[test]
    fn test_accepts_rejects_out_of_range_confidence() {
        let policy = ThresholdPolicy::new(0.5, 0.6).unwrap();
        assert!(!policy.accepts(PredictedCategory::Road, 5.0));
        assert!(!policy.accepts(PredictedCategory::Road, -0.1));
        assert!(!policy.accepts(PredictedCategory::Road, f32::NAN));
        assert!(!policy.accepts(PredictedCategory::Other, f32::INFINITY));
        assert!(policy.accepts(PredictedCategory::Road, 1.0));
    }
}
