pub mod prediction_handler;

pub use prediction_handler::{__path_predict_image, predict_image};
