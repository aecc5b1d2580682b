//! K-nearest-neighbors vote over stored training points.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Scaler, check_dimension, prepare_input};
use crate::ensemble::PredictError;
use crate::features::PasswordFeatures;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KNearestModel {
    pub k: usize,
    pub points: Vec<Vec<f64>>,
    pub targets: Vec<usize>,
    #[serde(default)]
    pub scaler: Option<Scaler>,
}

impl KNearestModel {
    /// Majority class among the `k` closest points (Euclidean). Vote ties
    /// go to the smaller class id.
    pub fn predict(&self, features: &PasswordFeatures) -> Result<usize, PredictError> {
        if self.k == 0 {
            return Err(PredictError::Malformed("k must be positive".to_string()));
        }
        if self.points.is_empty() {
            return Err(PredictError::Malformed("no training points".to_string()));
        }
        if self.points.len() != self.targets.len() {
            return Err(PredictError::Malformed(format!(
                "{} points but {} targets",
                self.points.len(),
                self.targets.len()
            )));
        }
        let x = prepare_input(features, self.scaler.as_ref())?;

        let mut distances = Vec::with_capacity(self.points.len());
        for (point, &target) in self.points.iter().zip(&self.targets) {
            check_dimension(point.len())?;
            let d: f64 = point.iter().zip(x.iter()).map(|(p, v)| (p - v).powi(2)).sum();
            distances.push((d, target));
        }
        distances.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut votes: BTreeMap<usize, usize> = BTreeMap::new();
        for (_, target) in distances.iter().take(self.k) {
            *votes.entry(*target).or_default() += 1;
        }

        // BTreeMap iterates in ascending class order, so the first max wins ties
        votes
            .iter()
            .fold(None, |best: Option<(usize, usize)>, (&class, &count)| match best {
                Some((_, c)) if count <= c => best,
                _ => Some((class, count)),
            })
            .map(|(class, _)| class)
            .ok_or_else(|| PredictError::Malformed("no neighbors".to_string()))
    }
}
