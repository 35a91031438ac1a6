use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassificationError {
    #[cfg(feature = "onnx")]
    #[error("Failed to load model: {0}")]
    ModelLoad(String),
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Model scoring failed: {0}")]
    Scoring(String),
}

/// Preprocessed model input in NHWC layout
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    pub shape: [usize; 4],
    pub data: Vec<f32>,
}

/// Frozen image model producing one probability per label, in label order.
///
/// Implementations are called from the blocking thread pool and may block.
pub trait ImageScorer: Send + Sync {
    fn score(&self, input: ImageTensor) -> Result<Vec<f32>, ClassificationError>;
}

#[cfg(feature = "onnx")]
pub use onnx::OnnxScorer;

#[cfg(feature = "onnx")]
mod onnx {
    use std::path::Path;
    use std::sync::Mutex;

    use ort::session::Session;
    use ort::value::Tensor;
    use tracing::info;

    use super::{ClassificationError, ImageScorer, ImageTensor};

    /// ONNX Runtime session over the exported issue classifier
    pub struct OnnxScorer {
        // `Session::run` takes `&mut self`
        session: Mutex<Session>,
    }

    impl OnnxScorer {
        pub fn load(model_path: &Path) -> Result<Self, ClassificationError> {
            if !model_path.exists() {
                return Err(ClassificationError::ModelLoad(format!(
                    "{} not found",
                    model_path.display()
                )));
            }

            let session = open_session(model_path)
                .map_err(|e| ClassificationError::ModelLoad(e.to_string()))?;

            info!(model = %model_path.display(), "loaded issue classifier");
            Ok(Self {
                session: Mutex::new(session),
            })
        }
    }

    impl ImageScorer for OnnxScorer {
        fn score(&self, input: ImageTensor) -> Result<Vec<f32>, ClassificationError> {
            let mut session = self
                .session
                .lock()
                .map_err(|_| ClassificationError::Scoring("session lock poisoned".to_string()))?;

            run(&mut session, input).map_err(|e| ClassificationError::Scoring(e.to_string()))
        }
    }

    fn open_session(model_path: &Path) -> anyhow::Result<Session> {
        Ok(Session::builder()?.commit_from_file(model_path)?)
    }

    fn run(session: &mut Session, input: ImageTensor) -> anyhow::Result<Vec<f32>> {
        let shape = input.shape.map(|d| d as i64);
        let tensor = Tensor::from_array((shape, input.data.into_boxed_slice()))?;

        let outputs = session.run(ort::inputs![tensor])?;
        let (_, probabilities) = outputs[0].try_extract_tensor::<f32>()?;

        Ok(probabilities.to_vec())
    }
}
