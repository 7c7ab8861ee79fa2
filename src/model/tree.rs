//! Decision tree and random forest classifiers
//!
//! Trees are flat node arrays, the layout scikit-learn's `tree_` attribute
//! exports. Node 0 is the root. A node with a `feature` is a split:
//! `x[feature] <= threshold` goes `left`, otherwise `right`. Anything else
//! is a leaf.
//!
//! A leaf carries either `probabilities` (the per-class row of `tree_.value`,
//! counts or fractions) or a single class in `value`, read as probability 1
//! for that class. Class index and label are the same thing: index 0 is
//! label 0, index 1 is label 1.
//!
//! Prediction follows `predict_proba` then argmax. A forest averages the
//! per-tree distributions (soft voting). On a tie argmax keeps the first
//! class, so an even 0/1 split is label 0.

use ndarray::{ArrayView1, ArrayView2};
use serde::Deserialize;

use super::{check_shape, Classifier, ModelError};
use crate::assessment::layout::FEATURE_COUNT;

#[derive(Debug, Clone, Deserialize)]
pub struct TreeNode {
    #[serde(default)]
    pub feature: Option<usize>,
    #[serde(default)]
    pub threshold: f64,
    #[serde(default)]
    pub left: Option<usize>,
    #[serde(default)]
    pub right: Option<usize>,
    #[serde(default)]
    pub value: Option<i64>,
    #[serde(default)]
    pub probabilities: Option<Vec<f64>>,
}

impl TreeNode {
    fn check_leaf(&self, index: usize) -> Result<(), ModelError> {
        match (&self.probabilities, self.value) {
            (Some(p), _) => {
                let valid = p.iter().all(|v| v.is_finite() && *v >= 0.0);
                if !valid || p.iter().sum::<f64>() <= 0.0 {
                    return Err(ModelError::Malformed(format!(
                        "leaf {} has invalid class probabilities {:?}",
                        index, p
                    )));
                }
            }
            (None, Some(v)) if v < 0 => {
                return Err(ModelError::Malformed(format!("leaf {} has negative class {}", index, v)));
            }
            (None, Some(_)) => {}
            (None, None) => {
                return Err(ModelError::Malformed(format!("leaf {} has no value", index)));
            }
        }
        Ok(())
    }

    /// Normalized class distribution of a leaf
    fn distribution(&self, index: usize) -> Result<Vec<f64>, ModelError> {
        if let Some(p) = &self.probabilities {
            let total: f64 = p.iter().sum();
            return Ok(p.iter().map(|v| v / total).collect());
        }

        let class = self
            .value
            .and_then(|v| usize::try_from(v).ok())
            .ok_or_else(|| ModelError::Malformed(format!("leaf {} has no value", index)))?;

        let mut one_hot = vec![0.0; class + 1];
        one_hot[class] = 1.0;
        Ok(one_hot)
    }
}

/// Index of the largest entry; the first one wins a tie
fn argmax(distribution: &[f64]) -> Result<i64, ModelError> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &p) in distribution.iter().enumerate() {
        if best.map_or(true, |(_, bp)| p > bp) {
            best = Some((i, p));
        }
    }

    best.map(|(i, _)| i as i64).ok_or(ModelError::EmptyOutput)
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Children must point forward, which also rules out cycles.
    pub fn check(&self) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::Malformed("tree has no nodes".to_string()));
        }

        for (i, node) in self.nodes.iter().enumerate() {
            let Some(feature) = node.feature else {
                node.check_leaf(i)?;
                continue;
            };

            if feature >= FEATURE_COUNT {
                return Err(ModelError::Malformed(format!(
                    "node {} splits on feature {} (only {} features)",
                    i, feature, FEATURE_COUNT
                )));
            }
            if !node.threshold.is_finite() {
                return Err(ModelError::Malformed(format!("node {} has non-finite threshold", i)));
            }
            for child in [node.left, node.right] {
                match child {
                    Some(c) if c > i && c < self.nodes.len() => {}
                    _ => {
                        return Err(ModelError::Malformed(format!(
                            "node {} has invalid child {:?}",
                            i, child
                        )))
                    }
                }
            }
        }

        Ok(())
    }

    /// Walk from the root to a leaf and return its class distribution
    pub fn predict_proba(&self, row: ArrayView1<'_, f64>) -> Result<Vec<f64>, ModelError> {
        let mut index = 0;

        // A checked tree reaches a leaf in at most nodes.len() steps
        for _ in 0..self.nodes.len() {
            let node = self
                .nodes
                .get(index)
                .ok_or_else(|| ModelError::Malformed(format!("node {} out of range", index)))?;

            let (feature, left, right) = match (node.feature, node.left, node.right) {
                (Some(f), Some(l), Some(r)) => (f, l, r),
                _ => return node.distribution(index),
            };

            let x = row
                .get(feature)
                .copied()
                .ok_or(ModelError::ShapeMismatch { expected: FEATURE_COUNT, actual: row.len() })?;

            index = if x <= node.threshold { left } else { right };
        }

        Err(ModelError::Malformed("tree traversal did not reach a leaf".to_string()))
    }

    pub fn classify(&self, row: ArrayView1<'_, f64>) -> Result<i64, ModelError> {
        argmax(&self.predict_proba(row)?)
    }
}

impl Classifier for DecisionTree {
    fn kind(&self) -> &'static str {
        "decision_tree"
    }

    fn predict(&self, batch: ArrayView2<'_, f64>) -> Result<Vec<i64>, ModelError> {
        check_shape(&batch)?;
        batch.rows().into_iter().map(|row| self.classify(row)).collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RandomForest {
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn check(&self) -> Result<(), ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::Malformed("forest has no trees".to_string()));
        }
        self.trees.iter().try_for_each(DecisionTree::check)
    }

    /// Mean of the per-tree class distributions
    pub fn predict_proba(&self, row: ArrayView1<'_, f64>) -> Result<Vec<f64>, ModelError> {
        let mut total: Vec<f64> = Vec::new();
        for tree in &self.trees {
            let p = tree.predict_proba(row)?;
            if total.len() < p.len() {
                total.resize(p.len(), 0.0);
            }
            for (t, v) in total.iter_mut().zip(p) {
                *t += v;
            }
        }

        let n = self.trees.len() as f64;
        Ok(total.into_iter().map(|t| t / n).collect())
    }

    pub fn classify(&self, row: ArrayView1<'_, f64>) -> Result<i64, ModelError> {
        argmax(&self.predict_proba(row)?)
    }
}

impl Classifier for RandomForest {
    fn kind(&self) -> &'static str {
        "random_forest"
    }

    fn predict(&self, batch: ArrayView2<'_, f64>) -> Result<Vec<i64>, ModelError> {
        check_shape(&batch)?;
        batch.rows().into_iter().map(|row| self.classify(row)).collect()
    }
}
