mod classification;
mod labels;
mod policy;

pub use classification::{ClassificationResult, PredictedCategory};
pub use labels::LabelSet;
pub use policy::ThresholdPolicy;
