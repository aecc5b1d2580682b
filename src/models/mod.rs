//! Serialized model artifacts
//!
//! Each classifier artifact is a JSON document tagged by `kind`; the label
//! encoder is a plain list of class names.

mod encoder;
mod forest;
mod knn;
mod linear;

use serde::{Deserialize, Serialize};

use crate::ensemble::{ClassifierHandle, PredictError};
use crate::features::{FEATURE_COUNT, PasswordFeatures};

pub use encoder::LabelEncoder;
pub use forest::{ForestModel, TreeNode};
pub use knn::KNearestModel;
pub use linear::LinearModel;

/// Per-feature standardization applied before prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl Scaler {
    fn transform(&self, x: &[f64; FEATURE_COUNT]) -> Result<[f64; FEATURE_COUNT], PredictError> {
        check_dimension(self.mean.len())?;
        check_dimension(self.scale.len())?;
        let mut out = [0.0; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            // zero-variance features are left centered, not divided
            let scale = if self.scale[i] == 0.0 { 1.0 } else { self.scale[i] };
            out[i] = (x[i] - self.mean[i]) / scale;
        }
        Ok(out)
    }
}

/// Builds the model input, standardized when a scaler is present.
fn prepare_input(
    features: &PasswordFeatures,
    scaler: Option<&Scaler>,
) -> Result<[f64; FEATURE_COUNT], PredictError> {
    let x = features.to_vector();
    match scaler {
        Some(s) => s.transform(&x),
        None => Ok(x),
    }
}

fn check_dimension(found: usize) -> Result<(), PredictError> {
    if found != FEATURE_COUNT {
        return Err(PredictError::DimensionMismatch {
            expected: FEATURE_COUNT,
            found,
        });
    }
    Ok(())
}

/// Index of the largest score; first index wins ties.
fn argmax(scores: &[f64]) -> Option<usize> {
    scores
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &s)| match best {
            Some((_, b)) if s <= b => best,
            _ => Some((i, s)),
        })
        .map(|(i, _)| i)
}

/// A classifier artifact as stored on disk or served over HTTP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearModel),
    KNearest(KNearestModel),
    Forest(ForestModel),
}

impl ClassifierHandle for ModelArtifact {
    fn predict(&self, features: &PasswordFeatures) -> Result<usize, PredictError> {
        match self {
            ModelArtifact::Linear(m) => m.predict(features),
            ModelArtifact::KNearest(m) => m.predict(features),
            ModelArtifact::Forest(m) => m.predict(features),
        }
    }
}
