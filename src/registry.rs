//! Model registry
//!
//! Loads the classifier artifacts and the label encoder once per process
//! and hands out shared, read-only handles.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::ensemble::{ClassifierName, ClassifierSet, LabelDecoder};
use crate::models::{LabelEncoder, ModelArtifact};

static MODELS: RwLock<Option<Arc<ModelSet>>> = RwLock::new(None);

/// File name of the serialized label encoder.
pub const LABEL_ENCODER_FILE: &str = "label_encoder.json";

const DEFAULT_MODELS_PATH: &str = "./assets/models";

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model artifact not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to read model artifact: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse model artifact {name}: {source}")]
    ParseError {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[cfg(feature = "remote")]
    #[error("Failed to fetch model artifact: {0}")]
    HttpError(#[from] reqwest::Error),
    #[cfg(feature = "remote")]
    #[error("Failed to load model from {url}: HTTP {status}")]
    Status { url: String, status: u16 },
}

/// The four classifiers plus the decoder they share.
pub struct ModelSet {
    classifiers: ClassifierSet,
    decoder: Arc<dyn LabelDecoder>,
}

impl ModelSet {
    pub fn new(classifiers: ClassifierSet, decoder: Arc<dyn LabelDecoder>) -> Self {
        Self { classifiers, decoder }
    }

    pub fn classifiers(&self) -> &ClassifierSet {
        &self.classifiers
    }

    pub fn decoder(&self) -> &dyn LabelDecoder {
        self.decoder.as_ref()
    }
}

impl std::fmt::Debug for ModelSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelSet")
            .field("classifiers", &self.classifiers)
            .finish_non_exhaustive()
    }
}

/// Returns the model directory.
///
/// Priority:
/// 1. Environment variable `PWD_MODELS_PATH`
/// 2. Default path `./assets/models`
pub fn get_models_path() -> PathBuf {
    std::env::var("PWD_MODELS_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODELS_PATH))
}

/// Returns the remote base URL from `PWD_MODELS_URL`, if set.
pub fn get_models_url() -> Option<String> {
    std::env::var("PWD_MODELS_URL").ok().filter(|u| !u.trim().is_empty())
}

fn parse_artifact<T: DeserializeOwned>(name: &str, bytes: &[u8]) -> Result<T, ModelError> {
    serde_json::from_slice(bytes).map_err(|source| ModelError::ParseError {
        name: name.to_string(),
        source,
    })
}

fn read_artifact<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<T, ModelError> {
    let path = dir.join(name);
    if !path.exists() {
        #[cfg(feature = "tracing")]
        tracing::error!("Model initialization FAILED: FileNotFound {:?}", path);
        return Err(ModelError::FileNotFound(path));
    }
    let bytes = std::fs::read(&path)?;
    parse_artifact(name, &bytes)
}

/// Loads a model set from `dir` without touching the process-wide cache.
pub fn load_model_set_from_path<P: AsRef<Path>>(dir: P) -> Result<ModelSet, ModelError> {
    let dir = dir.as_ref();
    let decoder: LabelEncoder = read_artifact(dir, LABEL_ENCODER_FILE)?;

    let mut classifiers = ClassifierSet::new();
    for name in ClassifierName::ALL {
        let artifact: ModelArtifact = read_artifact(dir, name.artifact_file())?;
        classifiers.insert(name, Arc::new(artifact));
    }

    Ok(ModelSet::new(classifiers, Arc::new(decoder)))
}

/// Loads a model set by fetching every artifact under `base_url`.
///
/// Any non-success status aborts the load.
#[cfg(feature = "remote")]
pub async fn load_model_set_from_url(base_url: &str) -> Result<ModelSet, ModelError> {
    let client = reqwest::Client::new();

    let decoder: LabelEncoder = fetch_artifact(&client, base_url, LABEL_ENCODER_FILE).await?;

    let mut classifiers = ClassifierSet::new();
    for name in ClassifierName::ALL {
        let artifact: ModelArtifact = fetch_artifact(&client, base_url, name.artifact_file()).await?;
        classifiers.insert(name, Arc::new(artifact));
    }

    Ok(ModelSet::new(classifiers, Arc::new(decoder)))
}

#[cfg(feature = "remote")]
async fn fetch_artifact<T: DeserializeOwned>(
    client: &reqwest::Client,
    base_url: &str,
    name: &str,
) -> Result<T, ModelError> {
    let url = artifact_url(base_url, name);
    let response = client.get(&url).send().await?;

    let status = response.status();
    if !status.is_success() {
        #[cfg(feature = "tracing")]
        tracing::error!("Failed to load model from: {} (HTTP {})", url, status);
        return Err(ModelError::Status {
            url,
            status: status.as_u16(),
        });
    }

    let bytes = response.bytes().await?;
    parse_artifact(name, &bytes)
}

#[cfg_attr(not(feature = "remote"), allow(dead_code))]
fn artifact_url(base_url: &str, name: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), name)
}

fn cached_count() -> Option<usize> {
    let guard = MODELS.read().unwrap_or_else(|e| e.into_inner());
    guard.as_ref().map(|m| m.classifiers().len())
}

fn store(set: ModelSet) -> usize {
    let count = set.classifiers().len();
    let mut guard = MODELS.write().unwrap_or_else(|e| e.into_inner());
    // a concurrent initializer may have won; keep the first set
    if guard.is_none() {
        *guard = Some(Arc::new(set));
    }
    count
}

/// Initializes the process-wide model set from the configured directory.
///
/// # Environment Variable
///
/// Set `PWD_MODELS_PATH` to point at the artifact directory.
/// If not set, defaults to `./assets/models`.
///
/// # Errors
///
/// Returns error if any of the five artifacts is missing, unreadable or
/// malformed.
pub fn init_models() -> Result<usize, ModelError> {
    let path = get_models_path();
    init_models_from_path(&path)
}

/// Initializes the process-wide model set from a specific directory.
///
/// Idempotent: once a set is loaded, later calls return its classifier
/// count without reading anything.
pub fn init_models_from_path<P: AsRef<Path>>(dir: P) -> Result<usize, ModelError> {
    if let Some(count) = cached_count() {
        return Ok(count);
    }

    let set = load_model_set_from_path(dir.as_ref())?;
    let count = store(set);

    #[cfg(feature = "tracing")]
    tracing::info!("Models initialized: {} classifiers from {:?}", count, dir.as_ref());

    Ok(count)
}

/// Initializes the process-wide model set from a remote base URL.
#[cfg(feature = "remote")]
pub async fn init_models_from_url(base_url: &str) -> Result<usize, ModelError> {
    if let Some(count) = cached_count() {
        return Ok(count);
    }

    let set = load_model_set_from_url(base_url).await?;
    let count = store(set);

    #[cfg(feature = "tracing")]
    tracing::info!("Models initialized: {} classifiers from {}", count, base_url);

    Ok(count)
}

/// Returns the loaded model set.
///
/// Returns `None` if no `init_models*` call has succeeded.
pub fn get_models() -> Option<Arc<ModelSet>> {
    let guard = MODELS.read().unwrap_or_else(|e| e.into_inner());
    guard.clone()
}

/// Resets the model cache for testing purposes.
#[cfg(test)]
pub fn reset_models_for_testing() {
    let mut guard = MODELS.write().unwrap_or_else(|e| e.into_inner());
    *guard = None;
}

/// File name and JSON body of a complete, valid artifact set.
#[cfg(test)]
pub(crate) fn test_artifacts() -> Vec<(&'static str, &'static str)> {
    let linear = r#"{"kind": "linear",
        "coef": [[0.0, 0.0, 0.0, -1.0], [0.0, 0.0, 0.0, 0.0], [0.0, 0.0, 0.0, 1.0]],
        "intercept": [8.5, 0.0, -12.5],
        "classes": [2, 0, 1]}"#;
    let forest = r#"{"kind": "forest",
        "trees": [[
            {"split": {"feature": 3, "threshold": 8.5, "left": 1, "right": 2}},
            {"leaf": {"values": [0.0, 0.0, 1.0]}},
            {"split": {"feature": 3, "threshold": 12.5, "left": 3, "right": 4}},
            {"leaf": {"values": [1.0, 0.0, 0.0]}},
            {"leaf": {"values": [0.0, 1.0, 0.0]}}
        ]],
        "classes": [0, 1, 2]}"#;
    let knn = r#"{"kind": "k_nearest", "k": 1,
        "points": [[1, 0, 0, 4], [1, 0, 0, 10], [1, 1, 1, 16]],
        "targets": [2, 0, 1]}"#;
    // label ids follow alphabetical encoding: Medium, Strong, Weak
    let encoder = r#"{"classes": ["Medium", "Strong", "Weak"]}"#;

    vec![
        ("logistic_regression_model.json", linear),
        ("random_forest_model.json", forest),
        ("knn_model.json", knn),
        ("svm_model.json", linear),
        (LABEL_ENCODER_FILE, encoder),
    ]
}

/// Writes a complete, valid artifact directory.
#[cfg(test)]
pub(crate) fn write_test_artifacts(dir: &Path) {
    for (name, body) in test_artifacts() {
        std::fs::write(dir.join(name), body).expect("write");
    }
}
