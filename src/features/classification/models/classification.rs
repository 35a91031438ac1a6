use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

use crate::features::issues::models::IssueCategory;

/// Category produced by the image classifier.
///
/// `Unknown` means the classifier declined to commit and is distinct from `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PredictedCategory {
    Road,
    Garbage,
    Water,
    Electricity,
    Other,
    Unknown,
}

impl PredictedCategory {
    /// Issue category this prediction maps to; `None` for `Unknown`
    pub fn issue_category(self) -> Option<IssueCategory> {
        match self {
            PredictedCategory::Road => Some(IssueCategory::Road),
            PredictedCategory::Garbage => Some(IssueCategory::Garbage),
            PredictedCategory::Water => Some(IssueCategory::Water),
            PredictedCategory::Electricity => Some(IssueCategory::Electricity),
            PredictedCategory::Other => Some(IssueCategory::Other),
            PredictedCategory::Unknown => None,
        }
    }
}

impl From<IssueCategory> for PredictedCategory {
    fn from(category: IssueCategory) -> Self {
        match category {
            IssueCategory::Road => PredictedCategory::Road,
            IssueCategory::Garbage => PredictedCategory::Garbage,
            IssueCategory::Water => PredictedCategory::Water,
            IssueCategory::Electricity => PredictedCategory::Electricity,
            IssueCategory::Other => PredictedCategory::Other,
        }
    }
}

impl FromStr for PredictedCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "road" => Ok(PredictedCategory::Road),
            "garbage" => Ok(PredictedCategory::Garbage),
            "water" => Ok(PredictedCategory::Water),
            "electricity" => Ok(PredictedCategory::Electricity),
            "other" => Ok(PredictedCategory::Other),
            "unknown" => Ok(PredictedCategory::Unknown),
            other => Err(format!("Unknown category label: {}", other)),
        }
    }
}

impl std::fmt::Display for PredictedCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PredictedCategory::Road => write!(f, "road"),
            PredictedCategory::Garbage => write!(f, "garbage"),
            PredictedCategory::Water => write!(f, "water"),
            PredictedCategory::Electricity => write!(f, "electricity"),
            PredictedCategory::Other => write!(f, "other"),
            PredictedCategory::Unknown => write!(f, "unknown"),
        }
    }
}

/// Outcome of classifying one image. Never persisted on its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ClassificationResult {
    pub category: PredictedCategory,
    /// Probability of `category`, in [0, 1]; always 0.0 for `Unknown`
    pub confidence: f32,
}

impl ClassificationResult {
    pub fn unknown() -> Self {
        Self {
            category: PredictedCategory::Unknown,
            confidence: 0.0,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.category == PredictedCategory::Unknown
    }
}
