//! Model Module - classifier loading and inference
//!
//! The artifact is loaded once at startup into a `ModelHandle` and shared
//! read-only for the life of the process. Backends sit behind `Classifier`
//! so the handler never knows which format it was given.

pub mod linear;
pub mod native;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod tree;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::assessment::layout::{LayoutInfo, LayoutMismatchError, FEATURE_COUNT};
use crate::assessment::FeatureVector;

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to read model artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unsupported model format: {0}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    LayoutMismatch(#[from] LayoutMismatchError),

    #[error("malformed model: {0}")]
    Malformed(String),

    #[error("expected {expected} features per row, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("model returned unrecognized label {0}")]
    UnrecognizedLabel(i64),

    #[error("model returned no prediction")]
    EmptyOutput,

    #[error("model runtime error: {0}")]
    Runtime(String),
}

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// A loaded binary classifier.
///
/// `predict` takes a batch of shape (n, FEATURE_COUNT) and returns one label
/// per row. Implementations must not mutate shared state in a way visible
/// to other callers.
pub trait Classifier: Send + Sync {
    /// Short backend name, e.g. "logistic_regression" or "onnx"
    fn kind(&self) -> &'static str;

    fn predict(&self, batch: ArrayView2<'_, f64>) -> Result<Vec<i64>, ModelError>;
}

/// Reject batches that don't have exactly FEATURE_COUNT columns
pub fn check_shape(batch: &ArrayView2<'_, f64>) -> Result<(), ModelError> {
    if batch.ncols() != FEATURE_COUNT {
        return Err(ModelError::ShapeMismatch {
            expected: FEATURE_COUNT,
            actual: batch.ncols(),
        });
    }
    Ok(())
}

// ============================================================================
// MODEL HANDLE
// ============================================================================

/// Where the classifier came from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub kind: String,
    /// SHA-256 of the artifact bytes, hex encoded
    pub checksum: Option<String>,
    pub loaded_at: DateTime<Utc>,
}

/// Model status for the status endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelStatus {
    pub loaded: bool,
    pub kind: String,
    pub model_path: String,
    pub checksum: Option<String>,
    pub loaded_at: DateTime<Utc>,
    pub layout: LayoutInfo,
    pub inference_count: u64,
    pub avg_latency_ms: f32,
}

#[derive(Debug, Default)]
struct InferenceStats {
    latency_sum_us: AtomicU64,
    count: AtomicU64,
}

impl InferenceStats {
    fn record(&self, elapsed_us: u64) {
        self.latency_sum_us.fetch_add(elapsed_us, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> (u64, f32) {
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let count = self.count.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f32 / count as f32) / 1000.0 } else { 0.0 };
        (count, avg)
    }
}

/// The process-wide model, constructed once and injected into app state
pub struct ModelHandle {
    classifier: Arc<dyn Classifier>,
    metadata: ModelMetadata,
    stats: InferenceStats,
}

impl ModelHandle {
    pub fn new(classifier: Arc<dyn Classifier>, metadata: ModelMetadata) -> Self {
        Self {
            classifier,
            metadata,
            stats: InferenceStats::default(),
        }
    }

    /// Wrap an in-memory classifier (no artifact on disk)
    pub fn from_classifier(classifier: impl Classifier + 'static) -> Self {
        Self::from_shared(Arc::new(classifier))
    }

    pub fn from_shared(classifier: Arc<dyn Classifier>) -> Self {
        let metadata = ModelMetadata {
            model_path: "<memory>".to_string(),
            kind: classifier.kind().to_string(),
            checksum: None,
            loaded_at: Utc::now(),
        };
        Self::new(classifier, metadata)
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Predict a single sample and return the first label
    pub fn predict_one(&self, features: &FeatureVector) -> Result<i64, ModelError> {
        let start = Instant::now();
        let batch = features.to_batch();
        let result = self.classifier.predict(batch.view());
        self.stats.record(start.elapsed().as_micros() as u64);

        result?.first().copied().ok_or(ModelError::EmptyOutput)
    }

    pub fn status(&self) -> ModelStatus {
        let (inference_count, avg_latency_ms) = self.stats.snapshot();

        ModelStatus {
            loaded: true,
            kind: self.metadata.kind.clone(),
            model_path: self.metadata.model_path.clone(),
            checksum: self.metadata.checksum.clone(),
            loaded_at: self.metadata.loaded_at,
            layout: LayoutInfo::current(),
            inference_count,
            avg_latency_ms,
        }
    }
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("kind", &self.classifier.kind())
            .field("metadata", &self.metadata)
            .finish()
    }
}

// ============================================================================
// LOADING
// ============================================================================

/// Load a model artifact from disk. The format is chosen by file extension.
pub fn load_model(path: &Path) -> Result<ModelHandle, ModelError> {
    tracing::info!("Loading model from: {}", path.display());

    let bytes = std::fs::read(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let checksum = hex::encode(Sha256::digest(&bytes));

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let classifier: Arc<dyn Classifier> = match extension.as_str() {
        "json" => native::from_json_slice(&bytes)?,
        "onnx" => load_onnx(&bytes)?,
        other => {
            return Err(ModelError::UnsupportedFormat(format!(
                "unknown extension {:?} (expected .json or .onnx)",
                other
            )))
        }
    };

    tracing::info!(
        kind = classifier.kind(),
        checksum = %checksum,
        "Model loaded successfully"
    );

    let metadata = ModelMetadata {
        model_path: path.display().to_string(),
        kind: classifier.kind().to_string(),
        checksum: Some(checksum),
        loaded_at: Utc::now(),
    };

    Ok(ModelHandle::new(classifier, metadata))
}

#[cfg(feature = "onnx")]
fn load_onnx(bytes: &[u8]) -> Result<Arc<dyn Classifier>, ModelError> {
    Ok(Arc::new(onnx::OnnxClassifier::from_memory(bytes)?))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(_bytes: &[u8]) -> Result<Arc<dyn Classifier>, ModelError> {
    Err(ModelError::UnsupportedFormat(
        "ONNX support not compiled in (rebuild with --features onnx)".to_string(),
    ))
}

// ============================================================================
// TEST DOUBLES
// ============================================================================
