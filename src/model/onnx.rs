//! ONNX Runtime backend
//!
//! Runs classifiers exported to ONNX (e.g. with skl2onnx). skl2onnx graphs
//! take a float32 tensor of shape (n, 8), so the batch is narrowed here and
//! nowhere else. The int64 `label` output is read, falling back to the first
//! declared output.

use ndarray::ArrayView2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use super::{check_shape, Classifier, ModelError};

const LABEL_OUTPUT: &str = "label";

pub struct OnnxClassifier {
    // Session::run needs exclusive access
    session: Mutex<Session>,
    output_name: String,
}

impl OnnxClassifier {
    pub fn from_memory(model_bytes: &[u8]) -> Result<Self, ModelError> {
        tracing::info!("Loading ONNX model from memory ({} bytes)", model_bytes.len());

        let session = Session::builder()
            .map_err(|e| ModelError::Runtime(format!("Session builder error: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ModelError::Runtime(format!("Optimization error: {}", e)))?
            .commit_from_memory(model_bytes)
            .map_err(|e| ModelError::Runtime(format!("Load from memory error: {}", e)))?;

        if session.inputs.len() != 1 {
            return Err(ModelError::Malformed(format!(
                "expected a single input tensor, model declares {}",
                session.inputs.len()
            )));
        }

        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name == LABEL_OUTPUT)
            .or_else(|| session.outputs.first())
            .map(|o| o.name.clone())
            .ok_or_else(|| ModelError::Malformed("no output defined".to_string()))?;

        tracing::debug!(output = %output_name, "ONNX session ready");

        Ok(Self {
            session: Mutex::new(session),
            output_name,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn kind(&self) -> &'static str {
        "onnx"
    }

    fn predict(&self, batch: ArrayView2<'_, f64>) -> Result<Vec<i64>, ModelError> {
        check_shape(&batch)?;

        let input_tensor = Value::from_array(batch.mapv(|v| v as f32))
            .map_err(|e| ModelError::Runtime(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| ModelError::Runtime(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(self.output_name.as_str())
            .ok_or_else(|| ModelError::Runtime(format!("missing output {}", self.output_name)))?;

        let (_, labels) = output
            .try_extract_tensor::<i64>()
            .map_err(|e| ModelError::Runtime(format!("Extract error: {}", e)))?;

        Ok(labels.to_vec())
    }
}
