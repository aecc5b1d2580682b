//! Model ensemble runner - one prediction per classifier, failures isolated.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::features::PasswordFeatures;

/// Failure of a single predict or decode call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictError {
    #[error("classifier is not loaded")]
    NotLoaded,
    #[error("expected {expected} features, model has {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("unknown class id {0}")]
    UnknownClass(usize),
    #[error("malformed model: {0}")]
    Malformed(String),
}

/// Opaque predictive capability: features in, internal class id out.
pub trait ClassifierHandle: Send + Sync {
    fn predict(&self, features: &PasswordFeatures) -> Result<usize, PredictError>;
}

/// Maps a classifier's internal class id to a human-readable label.
pub trait LabelDecoder: Send + Sync {
    fn decode(&self, class_id: usize) -> Result<String, PredictError>;
}

/// The four classifiers, in their fixed display and export order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassifierName {
    LogisticRegression,
    RandomForest,
    KNearestNeighbors,
    SupportVectorMachine,
}

impl ClassifierName {
    pub const ALL: [ClassifierName; 4] = [
        ClassifierName::LogisticRegression,
        ClassifierName::RandomForest,
        ClassifierName::KNearestNeighbors,
        ClassifierName::SupportVectorMachine,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassifierName::LogisticRegression => "Logistic Regression",
            ClassifierName::RandomForest => "Random Forest",
            ClassifierName::KNearestNeighbors => "K-Nearest Neighbors",
            ClassifierName::SupportVectorMachine => "Support Vector Machine",
        }
    }

    /// File name of the serialized artifact for this classifier.
    pub fn artifact_file(&self) -> &'static str {
        match self {
            ClassifierName::LogisticRegression => "logistic_regression_model.json",
            ClassifierName::RandomForest => "random_forest_model.json",
            ClassifierName::KNearestNeighbors => "knn_model.json",
            ClassifierName::SupportVectorMachine => "svm_model.json",
        }
    }
}

impl fmt::Display for ClassifierName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifier handles keyed by name. Missing entries are reported as
/// failures by [`run_ensemble`], never skipped.
#[derive(Clone, Default)]
pub struct ClassifierSet {
    handles: HashMap<ClassifierName, Arc<dyn ClassifierHandle>>,
}

impl ClassifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: ClassifierName, handle: Arc<dyn ClassifierHandle>) {
        self.handles.insert(name, handle);
    }

    pub fn with(mut self, name: ClassifierName, handle: Arc<dyn ClassifierHandle>) -> Self {
        self.insert(name, handle);
        self
    }

    pub fn get(&self, name: ClassifierName) -> Option<&dyn ClassifierHandle> {
        self.handles.get(&name).map(|h| h.as_ref())
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl fmt::Debug for ClassifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loaded: Vec<_> = ClassifierName::ALL
            .iter()
            .filter(|n| self.handles.contains_key(n))
            .map(|n| n.as_str())
            .collect();
        f.debug_struct("ClassifierSet").field("loaded", &loaded).finish()
    }
}

/// Outcome of one classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prediction {
    Label(String),
    /// Carries the first line of the failure description.
    Failed(String),
}

impl Prediction {
    fn failed(err: &PredictError) -> Self {
        let text = err.to_string();
        let line = text.lines().next().unwrap_or_default().trim();
        Prediction::Failed(line.to_string())
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Prediction::Label(label) => Some(label),
            Prediction::Failed(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Prediction::Failed(_))
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prediction::Label(label) => f.write_str(label),
            Prediction::Failed(reason) => write!(f, "Error: {}", reason),
        }
    }
}

/// One entry per classifier in [`ClassifierName::ALL`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionRecord {
    entries: Vec<(ClassifierName, Prediction)>,
}

impl PredictionRecord {
    pub fn iter(&self) -> impl Iterator<Item = (ClassifierName, &Prediction)> {
        self.entries.iter().map(|(name, p)| (*name, p))
    }

    pub fn get(&self, name: ClassifierName) -> Option<&Prediction> {
        self.entries.iter().find(|(n, _)| *n == name).map(|(_, p)| p)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when every fixed classifier name is present, in order.
    pub fn is_complete(&self) -> bool {
        self.entries.len() == ClassifierName::ALL.len()
            && self
                .entries
                .iter()
                .zip(ClassifierName::ALL.iter())
                .all(|((n, _), expected)| n == expected)
    }
}

/// Runs every classifier against `features` and decodes the results.
///
/// A failing classifier gets a [`Prediction::Failed`] entry and the run
/// continues with the next one. No retries.
pub fn run_ensemble(
    features: &PasswordFeatures,
    classifiers: &ClassifierSet,
    decoder: &dyn LabelDecoder,
) -> PredictionRecord {
    let mut entries = Vec::with_capacity(ClassifierName::ALL.len());

    for name in ClassifierName::ALL {
        let outcome = classifiers
            .get(name)
            .ok_or(PredictError::NotLoaded)
            .and_then(|handle| handle.predict(features))
            .and_then(|class_id| decoder.decode(class_id));

        let prediction = match outcome {
            Ok(label) => Prediction::Label(label),
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::error!("Prediction failed for classifier {}: {}", name, e);
                Prediction::failed(&e)
            }
        };
        entries.push((name, prediction));
    }

    PredictionRecord { entries }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Always predicts the same class id.
    pub struct FixedClassifier(pub usize);

    impl ClassifierHandle for FixedClassifier {
        fn predict(&self, _features: &PasswordFeatures) -> Result<usize, PredictError> {
            Ok(self.0)
        }
    }

    struct FailingClassifier;

    impl ClassifierHandle for FailingClassifier {
        fn predict(&self, _features: &PasswordFeatures) -> Result<usize, PredictError> {
            Err(PredictError::Malformed("weights missing\nsecond line".to_string()))
        }
    }

    struct CountingClassifier(AtomicUsize);

    impl ClassifierHandle for CountingClassifier {
        fn predict(&self, _features: &PasswordFeatures) -> Result<usize, PredictError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(0)
        }
    }

    /// Weak / Medium / Strong, like the trained label encoder.
    pub struct TestDecoder;

    impl LabelDecoder for TestDecoder {
        fn decode(&self, class_id: usize) -> Result<String, PredictError> {
            ["Weak", "Medium", "Strong"]
                .get(class_id)
                .map(|s| s.to_string())
                .ok_or(PredictError::UnknownClass(class_id))
        }
    }

    pub fn uniform_set(class_id: usize) -> ClassifierSet {
        ClassifierName::ALL.iter().fold(ClassifierSet::new(), |set, name| {
            set.with(*name, Arc::new(FixedClassifier(class_id)))
        })
    }

    fn features() -> PasswordFeatures {
        PasswordFeatures {
            has_lowercase: true,
            has_uppercase: true,
            has_special: true,
            length: 13,
        }
    }

    #[test]
    fn test_all_classifiers_agree() {
        let record = run_ensemble(&features(), &uniform_set(2), &TestDecoder);
        assert!(record.is_complete());
        let names: Vec<_> = record.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Logistic Regression",
                "Random Forest",
                "K-Nearest Neighbors",
                "Support Vector Machine"
            ]
        );
        for (_, prediction) in record.iter() {
            assert_eq!(prediction, &Prediction::Label("Strong".to_string()));
        }
    }

    #[test]
    fn test_single_failure_is_isolated() {
        let set = uniform_set(1).with(ClassifierName::RandomForest, Arc::new(FailingClassifier));
        let record = run_ensemble(&features(), &set, &TestDecoder);

        assert_eq!(record.len(), 4);
        let failed = record.get(ClassifierName::RandomForest).unwrap();
        assert!(failed.is_failed());
        assert_eq!(failed.to_string(), "Error: malformed model: weights missing");
        assert_eq!(failed.label(), None);

        for name in [
            ClassifierName::LogisticRegression,
            ClassifierName::KNearestNeighbors,
            ClassifierName::SupportVectorMachine,
        ] {
            assert_eq!(record.get(name).unwrap().label(), Some("Medium"));
        }
    }

    #[test]
    fn test_decode_failure_is_isolated() {
        let set = uniform_set(0).with(ClassifierName::SupportVectorMachine, Arc::new(FixedClassifier(7)));
        let record = run_ensemble(&features(), &set, &TestDecoder);

        assert_eq!(
            record.get(ClassifierName::SupportVectorMachine),
            Some(&Prediction::Failed("unknown class id 7".to_string()))
        );
        assert_eq!(record.get(ClassifierName::LogisticRegression).unwrap().label(), Some("Weak"));
    }

    #[test]
    fn test_empty_set_still_yields_four_entries() {
        let record = run_ensemble(&features(), &ClassifierSet::new(), &TestDecoder);
        assert!(record.is_complete());
        assert!(record.iter().all(|(_, p)| p.is_failed()));
        assert_eq!(
            record.get(ClassifierName::KNearestNeighbors).unwrap().to_string(),
            "Error: classifier is not loaded"
        );
    }

    #[test]
    fn test_run_is_repeatable() {
        let set = uniform_set(1).with(ClassifierName::LogisticRegression, Arc::new(FailingClassifier));
        let first = run_ensemble(&features(), &set, &TestDecoder);
        let second = run_ensemble(&features(), &set, &TestDecoder);
        assert_eq!(first, second);
    }

    #[test]
    fn test_each_classifier_called_once() {
        let counter = Arc::new(CountingClassifier(AtomicUsize::new(0)));
        let set = ClassifierName::ALL
            .iter()
            .fold(ClassifierSet::new(), |set, name| set.with(*name, counter.clone()));
        run_ensemble(&features(), &set, &TestDecoder);
        assert_eq!(counter.0.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_classifier_set_debug_lists_loaded() {
        let set = ClassifierSet::new().with(ClassifierName::RandomForest, Arc::new(FixedClassifier(0)));
        assert_eq!(set.len(), 1);
        assert!(format!("{:?}", set).contains("Random Forest"));
    }
}
