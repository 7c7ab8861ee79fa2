//! Feature Vector - model input for a single assessment

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::layout::{FEATURE_COUNT, FEATURE_LAYOUT};

/// Encoded features in the order defined by `FEATURE_LAYOUT`.
///
/// Only `AssessmentRequest::encode` should build one from user input; the
/// classifier silently misbehaves on anything else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    /// Single-sample batch of shape (1, FEATURE_COUNT)
    pub fn to_batch(&self) -> Array2<f64> {
        Array2::from_shape_fn((1, FEATURE_COUNT), |(_, j)| self.values[j])
    }

    /// Named values for debug logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::Value::Object(
            FEATURE_LAYOUT
                .iter()
                .zip(self.values.iter())
                .map(|(name, value)| (name.to_string(), serde_json::json!(value)))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_batch_shape() {
        let v = FeatureVector::from_values([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        let batch = v.to_batch();
        assert_eq!(batch.shape(), &[1, FEATURE_COUNT]);
        assert_eq!(batch[[0, 0]], 1.0);
        assert_eq!(batch[[0, 7]], 8.0);
    }

    #[test]
    fn test_batch_keeps_full_precision() {
        let v = FeatureVector::from_values([60.0, 1.0, 31.2, 0.0, 0.0, 4.0, 7.1, 180.0]);
        let batch = v.to_batch();
        assert_eq!(batch[[0, 2]], 31.2);
        assert_eq!(batch[[0, 6]], 7.1);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let v = FeatureVector::from_values([30.0, 0.0, 22.0, 1.0, 1.0, 1.0, 5.0, 95.0]);
        let json = serde_json::to_value(v).unwrap();
        assert_eq!(json, serde_json::json!([30.0, 0.0, 22.0, 1.0, 1.0, 1.0, 5.0, 95.0]));
    }

    #[test]
    fn test_log_entry_is_named() {
        let v = FeatureVector::from_values([30.0, 0.0, 22.0, 1.0, 1.0, 1.0, 5.0, 95.0]);
        let entry = v.to_log_entry();
        assert_eq!(entry["hba1c"], serde_json::json!(5.0));
        assert_eq!(entry.as_object().unwrap().len(), FEATURE_COUNT);
    }
}
