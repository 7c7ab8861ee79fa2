//! Logistic regression, optionally preceded by a standard scaler

use ndarray::{ArrayView1, ArrayView2};
use serde::Deserialize;

use super::{check_shape, Classifier, ModelError};
use crate::assessment::layout::FEATURE_COUNT;

fn default_threshold() -> f64 {
    0.5
}

/// `x' = (x - mean) / scale`, per feature
#[derive(Debug, Clone, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub scaler: Option<StandardScaler>,
    /// Probability at or above which the label is 1
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl LogisticRegression {
    pub fn check(&self) -> Result<(), ModelError> {
        if self.coefficients.len() != FEATURE_COUNT {
            return Err(ModelError::Malformed(format!(
                "expected {} coefficients, got {}",
                FEATURE_COUNT,
                self.coefficients.len()
            )));
        }

        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ModelError::Malformed(format!(
                "threshold {} outside [0, 1]",
                self.threshold
            )));
        }

        let finite = self.coefficients.iter().all(|c| c.is_finite()) && self.intercept.is_finite();
        if !finite {
            return Err(ModelError::Malformed("non-finite coefficient".to_string()));
        }

        if let Some(scaler) = &self.scaler {
            if scaler.mean.len() != FEATURE_COUNT || scaler.scale.len() != FEATURE_COUNT {
                return Err(ModelError::Malformed(format!(
                    "scaler needs {} means and scales, got {} and {}",
                    FEATURE_COUNT,
                    scaler.mean.len(),
                    scaler.scale.len()
                )));
            }
            if scaler.scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
                return Err(ModelError::Malformed("scaler has zero or non-finite scale".to_string()));
            }
        }

        Ok(())
    }

    /// Probability of the positive class for one row
    pub fn probability(&self, row: ArrayView1<'_, f64>) -> f64 {
        let mut x = row.to_owned();

        if let Some(scaler) = &self.scaler {
            x = (&x - &ArrayView1::from(&scaler.mean[..])) / &ArrayView1::from(&scaler.scale[..]);
        }

        let z = x.dot(&ArrayView1::from(&self.coefficients[..])) + self.intercept;
        1.0 / (1.0 + (-z).exp())
    }
}

impl Classifier for LogisticRegression {
    fn kind(&self) -> &'static str {
        "logistic_regression"
    }

    fn predict(&self, batch: ArrayView2<'_, f64>) -> Result<Vec<i64>, ModelError> {
        check_shape(&batch)?;

        Ok(batch
            .rows()
            .into_iter()
            .map(|row| i64::from(self.probability(row) >= self.threshold))
            .collect())
    }
}
