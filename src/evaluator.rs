//! Password check pipeline - extraction, length bucket, ensemble, report.

use chrono::Local;
use secrecy::{ExposeSecret, SecretString};

#[cfg(feature = "async")]
use std::sync::Arc;

#[cfg(feature = "async")]
use tokio::sync::mpsc;

#[cfg(feature = "async")]
use tokio_util::sync::CancellationToken;

use crate::ensemble::run_ensemble;
use crate::features::extract;
use crate::heuristic::classify_by_length;
use crate::registry::ModelSet;
use crate::report::{Report, assemble};

/// Runs the full check for one password.
///
/// Always yields a bucket and one entry per classifier, whatever the
/// classifiers do.
pub fn check_password(password: &SecretString, models: &ModelSet) -> Report {
    let features = extract(password);
    let bucket = classify_by_length(features.length);
    let predictions = run_ensemble(&features, models.classifiers(), models.decoder());

    assemble(copy_secret(password), bucket, predictions, Local::now())
}

fn copy_secret(password: &SecretString) -> SecretString {
    SecretString::new(password.expose_secret().to_string().into())
}

/// Async version that sends the report via channel.
///
/// The ensemble runs on a blocking task. If `token` is cancelled first the
/// result is dropped and nothing is sent.
#[cfg(feature = "async")]
pub async fn check_password_tx(
    password: &SecretString,
    models: Arc<ModelSet>,
    token: CancellationToken,
    tx: mpsc::Sender<Report>,
) {
    #[cfg(feature = "tracing")]
    tracing::info!("password check is about to start...");

    let features = extract(password);
    let bucket = classify_by_length(features.length);

    let job = tokio::task::spawn_blocking(move || {
        run_ensemble(&features, models.classifiers(), models.decoder())
    });

    let predictions = tokio::select! {
        biased;
        _ = token.cancelled() => {
            #[cfg(feature = "tracing")]
            tracing::debug!("password check cancelled");
            return;
        }
        joined = job => match joined {
            Ok(predictions) => predictions,
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::error!("Ensemble task failed: {}", _e);
                return;
            }
        },
    };

    let report = assemble(copy_secret(password), bucket, predictions, Local::now());

    if let Err(_e) = tx.send(report).await {
        #[cfg(feature = "tracing")]
        tracing::error!("Failed to send password report: {}", _e);
    }
}


#[cfg(all(test, feature = "async"))]
mod async_tests {
    use super::*;
    use crate::ensemble::tests::{TestDecoder, uniform_set};
    use crate::heuristic::StrengthBucket;

    fn secret(s: &str) -> SecretString {
        SecretString::new(s.to_string().into())
    }

    fn mock_models(class_id: usize) -> Arc<ModelSet> {
        Arc::new(ModelSet::new(uniform_set(class_id), Arc::new(TestDecoder)))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_check_password_tx() {
        let (tx, mut rx) = mpsc::channel(1);
        let token = CancellationToken::new();

        check_password_tx(&secret("MyPass123!"), mock_models(1), token, tx).await;

        let report = rx.recv().await.expect("Should receive report");
        assert_eq!(report.bucket(), StrengthBucket::Medium);
        assert!(report.predictions().iter().all(|(_, p)| p.label() == Some("Medium")));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_check_password_tx_cancelled() {
        let (tx, mut rx) = mpsc::channel(1);
        let token = CancellationToken::new();
        token.cancel();

        check_password_tx(&secret("MyPass123!"), mock_models(1), token, tx).await;

        assert!(rx.recv().await.is_none());
    }
}
