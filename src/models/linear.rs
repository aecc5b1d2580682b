//! Linear decision function - logistic regression and linear SVM.

use serde::{Deserialize, Serialize};

use super::{Scaler, argmax, check_dimension, prepare_input};
use crate::ensemble::PredictError;
use crate::features::PasswordFeatures;

/// One-vs-rest linear model.
///
/// `coef` holds one row per class, or a single row for a binary problem
/// where a positive decision selects `classes[1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
    pub classes: Vec<usize>,
    #[serde(default)]
    pub scaler: Option<Scaler>,
}

impl LinearModel {
    pub fn predict(&self, features: &PasswordFeatures) -> Result<usize, PredictError> {
        if self.coef.len() != self.intercept.len() {
            return Err(PredictError::Malformed(format!(
                "{} coefficient rows but {} intercepts",
                self.coef.len(),
                self.intercept.len()
            )));
        }
        let x = prepare_input(features, self.scaler.as_ref())?;

        let mut scores = Vec::with_capacity(self.coef.len());
        for (row, b) in self.coef.iter().zip(&self.intercept) {
            check_dimension(row.len())?;
            scores.push(row.iter().zip(x.iter()).map(|(w, v)| w * v).sum::<f64>() + b);
        }

        let index = match scores.as_slice() {
            [] => return Err(PredictError::Malformed("no coefficients".to_string())),
            [single] if self.classes.len() == 2 => usize::from(*single > 0.0),
            _ => {
                if scores.len() != self.classes.len() {
                    return Err(PredictError::Malformed(format!(
                        "{} decision rows for {} classes",
                        scores.len(),
                        self.classes.len()
                    )));
                }
                argmax(&scores).unwrap_or(0)
            }
        };

        self.classes
            .get(index)
            .copied()
            .ok_or_else(|| PredictError::Malformed("class index out of range".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(length: usize, special: bool) -> PasswordFeatures {
        PasswordFeatures {
            has_lowercase: true,
            has_uppercase: false,
            has_special: special,
            length,
        }
    }

    /// Three classes scored on length, with a bonus for special characters.
    fn multiclass() -> LinearModel {
        LinearModel {
            coef: vec![
                vec![0.0, 0.0, 0.0, -1.0],
                vec![0.0, 0.0, 0.0, 0.0],
                vec![0.0, 0.0, 4.0, 1.0],
            ],
            intercept: vec![8.0, 0.0, -12.0],
            classes: vec![0, 1, 2],
            scaler: None,
        }
    }

    #[test]
    fn test_multiclass_argmax() {
        let model = multiclass();
        assert_eq!(model.predict(&features(4, false)), Ok(0));
        assert_eq!(model.predict(&features(9, false)), Ok(1));
        assert_eq!(model.predict(&features(14, false)), Ok(2));
        assert_eq!(model.predict(&features(10, true)), Ok(2));
    }

    #[test]
    fn test_binary_decision() {
        let model = LinearModel {
            coef: vec![vec![0.0, 0.0, 0.0, 1.0]],
            intercept: vec![-8.5],
            classes: vec![0, 2],
            scaler: None,
        };
        assert_eq!(model.predict(&features(8, false)), Ok(0));
        assert_eq!(model.predict(&features(9, false)), Ok(2));
    }

    #[test]
    fn test_scaler_applied() {
        let model = LinearModel {
            coef: vec![vec![0.0, 0.0, 0.0, 1.0]],
            intercept: vec![0.0],
            classes: vec![0, 1],
            scaler: Some(Scaler {
                mean: vec![0.0, 0.0, 0.0, 10.0],
                scale: vec![1.0, 1.0, 1.0, 1.0],
            }),
        };
        assert_eq!(model.predict(&features(9, false)), Ok(0));
        assert_eq!(model.predict(&features(11, false)), Ok(1));
    }

    #[test]
    fn test_wrong_coefficient_width() {
        let model = LinearModel {
            coef: vec![vec![1.0, 2.0]],
            intercept: vec![0.0],
            classes: vec![0, 1],
            scaler: None,
        };
        assert_eq!(
            model.predict(&features(3, false)),
            Err(PredictError::DimensionMismatch { expected: 4, found: 2 })
        );
    }

    #[test]
    fn test_mismatched_intercepts() {
        let mut model = multiclass();
        model.intercept.pop();
        assert!(matches!(
            model.predict(&features(3, false)),
            Err(PredictError::Malformed(_))
        ));
    }
}
