//! Native JSON model artifacts
//!
//! ```json
//! {
//!   "kind": "logistic_regression",
//!   "feature_names": ["age", "sex", ...],
//!   "coefficients": [...], "intercept": -5.0
//! }
//! ```
//!
//! `feature_names` is optional; when present it must match the feature layout.

use std::sync::Arc;

use serde::Deserialize;

use super::linear::LogisticRegression;
use super::tree::{DecisionTree, RandomForest};
use super::{Classifier, ModelError};
use crate::assessment::layout::validate_names;

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NativeModel {
    LogisticRegression(LogisticRegression),
    DecisionTree(DecisionTree),
    RandomForest(RandomForest),
}

#[derive(Debug, Deserialize)]
pub struct ModelArtifact {
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,

    #[serde(flatten)]
    pub model: NativeModel,
}

impl ModelArtifact {
    /// Check layout and structure, then hand back the classifier
    pub fn into_classifier(self) -> Result<Arc<dyn Classifier>, ModelError> {
        if let Some(names) = &self.feature_names {
            validate_names(names)?;
        }

        let classifier: Arc<dyn Classifier> = match self.model {
            NativeModel::LogisticRegression(m) => {
                m.check()?;
                Arc::new(m)
            }
            NativeModel::DecisionTree(m) => {
                m.check()?;
                Arc::new(m)
            }
            NativeModel::RandomForest(m) => {
                m.check()?;
                Arc::new(m)
            }
        };

        Ok(classifier)
    }
}

pub fn from_json_slice(bytes: &[u8]) -> Result<Arc<dyn Classifier>, ModelError> {
    let artifact: ModelArtifact = serde_json::from_slice(bytes)?;
    artifact.into_classifier()
}
