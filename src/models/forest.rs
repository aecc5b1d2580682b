//! Random forest - averaged leaf weights over flat decision trees.

use serde::{Deserialize, Serialize};

use super::argmax;
use crate::ensemble::PredictError;
use crate::features::{FEATURE_COUNT, PasswordFeatures};

/// Node of a flat tree. Children are indices into the same node list;
/// `x[feature] <= threshold` goes left. Node `0` is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        /// Weight per entry of the forest's `classes`.
        values: Vec<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestModel {
    pub trees: Vec<Vec<TreeNode>>,
    pub classes: Vec<usize>,
}

impl ForestModel {
    pub fn predict(&self, features: &PasswordFeatures) -> Result<usize, PredictError> {
        if self.trees.is_empty() {
            return Err(PredictError::Malformed("forest has no trees".to_string()));
        }
        let x = features.to_vector();

        let mut totals = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            let leaf = walk(tree, &x)?;
            if leaf.len() != totals.len() {
                return Err(PredictError::Malformed(format!(
                    "leaf has {} values for {} classes",
                    leaf.len(),
                    totals.len()
                )));
            }
            let sum: f64 = leaf.iter().sum();
            let norm = if sum > 0.0 { sum } else { 1.0 };
            for (t, v) in totals.iter_mut().zip(leaf) {
                *t += v / norm;
            }
        }

        argmax(&totals)
            .and_then(|i| self.classes.get(i).copied())
            .ok_or_else(|| PredictError::Malformed("forest has no classes".to_string()))
    }
}

/// Follows splits from the root to a leaf. A path longer than the node
/// count means the tree has a cycle.
fn walk<'a>(tree: &'a [TreeNode], x: &[f64; FEATURE_COUNT]) -> Result<&'a [f64], PredictError> {
    let mut index = 0;
    for _ in 0..=tree.len() {
        match tree.get(index) {
            Some(TreeNode::Leaf { values }) => return Ok(values.as_slice()),
            Some(TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            }) => {
                let value = x.get(*feature).ok_or(PredictError::DimensionMismatch {
                    expected: FEATURE_COUNT,
                    found: feature + 1,
                })?;
                index = if *value <= *threshold { *left } else { *right };
            }
            None => {
                return Err(PredictError::Malformed(format!("node {} out of range", index)));
            }
        }
    }
    Err(PredictError::Malformed("tree contains a cycle".to_string()))
}
