mod classification_service;
pub mod preprocess;
pub mod scorer;

pub use classification_service::ClassificationService;
