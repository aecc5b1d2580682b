//! Password strength classification library
//!
//! This library estimates password strength two ways: a length-based
//! heuristic and an ensemble of four pre-trained classifiers, then
//! assembles the result into a report that can be exported as PDF or CSV.
//!
//! # Features
//!
//! - `async` (default): Enables the channel-based check with cancellation support
//! - `cli`: Builds the `pwd-classify` binary
//! - `remote`: Enables fetching model artifacts over HTTP
//! - `tracing`: Enables logging via tracing crate
//!
//! # Environment Variables
//!
//! - `PWD_MODELS_PATH`: Directory holding the model artifacts
//!   (default: `./assets/models`)
//! - `PWD_MODELS_URL`: Base URL for remote model artifacts (`remote` only)
//!
//! # Example
//!
//! ```rust,no_run
//! use pwd_classify::{check_password, get_models, init_models, report_to_csv};
//! use secrecy::SecretString;
//!
//! // Load the models (call once at startup)
//! init_models().expect("Failed to load models");
//! let models = get_models().expect("models loaded");
//!
//! let password = SecretString::new("Sunshine2024!".to_string().into());
//! let report = check_password(&password, &models);
//!
//! println!("Length estimate: {}", report.bucket());
//! for (name, prediction) in report.predictions().iter() {
//!     println!("{}: {}", name, prediction);
//! }
//! let csv = report_to_csv(&report).expect("csv export");
//! ```

// Internal modules
mod ensemble;
mod evaluator;
mod export;
mod features;
mod heuristic;
mod models;
mod registry;
mod report;

// Public API
pub use ensemble::{
    ClassifierHandle, ClassifierName, ClassifierSet, LabelDecoder, PredictError, Prediction,
    PredictionRecord, run_ensemble,
};
pub use evaluator::check_password;
pub use export::{CSV_FILE_NAME, ExportError, PDF_FILE_NAME, report_to_csv, report_to_pdf};
pub use features::{FEATURE_COUNT, PasswordFeatures, extract};
pub use heuristic::{
    BucketColor, MIN_ADVISED_LENGTH, PASSWORD_TIPS, StrengthBucket, classify_by_length,
    short_password_advisory,
};
pub use models::{ForestModel, KNearestModel, LabelEncoder, LinearModel, ModelArtifact, Scaler, TreeNode};
pub use registry::{
    LABEL_ENCODER_FILE, ModelError, ModelSet, get_models, get_models_path, get_models_url,
    init_models, init_models_from_path, load_model_set_from_path,
};
pub use report::{Report, TIMESTAMP_FORMAT, assemble};

#[cfg(feature = "async")]
pub use evaluator::check_password_tx;

#[cfg(feature = "remote")]
pub use registry::{init_models_from_url, load_model_set_from_url};
