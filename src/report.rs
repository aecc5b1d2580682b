//! Report assembly - the record handed to the exporters.

use chrono::{DateTime, Local};
use secrecy::{ExposeSecret, SecretString};

use crate::ensemble::PredictionRecord;
use crate::heuristic::{StrengthBucket, short_password_advisory};

/// Timestamp layout used by every export format.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Result of one password check. Read-only once assembled.
#[derive(Debug)]
pub struct Report {
    password: SecretString,
    bucket: StrengthBucket,
    predictions: PredictionRecord,
    timestamp: DateTime<Local>,
}

impl Report {
    pub fn password(&self) -> &SecretString {
        &self.password
    }

    pub fn bucket(&self) -> StrengthBucket {
        self.bucket
    }

    pub fn predictions(&self) -> &PredictionRecord {
        &self.predictions
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Advisory for passwords under the recommended minimum length.
    pub fn short_password_advisory(&self) -> Option<String> {
        short_password_advisory(self.password.expose_secret().chars().count())
    }
}

/// Composes a report. Performs no I/O.
///
/// `predictions` must hold every classifier in fixed order, which
/// [`run_ensemble`](crate::run_ensemble) guarantees.
pub fn assemble(
    password: SecretString,
    bucket: StrengthBucket,
    predictions: PredictionRecord,
    now: DateTime<Local>,
) -> Report {
    debug_assert!(
        predictions.is_complete(),
        "prediction record is missing classifiers"
    );
    Report {
        password,
        bucket,
        predictions,
        timestamp: now,
    }
}
