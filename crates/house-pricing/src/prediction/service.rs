use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::PredictionView;
use super::estimator::PriceEstimator;
use super::noise::NoiseSource;
use super::notification::{Notification, Notifier};
use super::repository::{PredictionId, PredictionRepository, RepositoryError, SavedPrediction};
use super::validation::{validate, RawForm, ValidationErrors};
use crate::config::PredictionConfig;

/// Cosmetic waits applied before answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyProfile {
    pub delay: Duration,
    pub jitter: Duration,
    pub save_delay: Duration,
}

impl LatencyProfile {
    pub fn immediate() -> Self {
        Self {
            delay: Duration::ZERO,
            jitter: Duration::ZERO,
            save_delay: Duration::ZERO,
        }
    }
}

impl From<&PredictionConfig> for LatencyProfile {
    fn from(config: &PredictionConfig) -> Self {
        Self {
            delay: config.delay,
            jitter: config.jitter,
            save_delay: config.save_delay,
        }
    }
}

/// Reply sent once a prediction lands in the wishlist.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SaveAcknowledgement {
    pub saved: SavedPrediction,
    pub notification: Notification,
}

/// Service composing validation, pricing, formatting and the wishlist.
pub struct PredictionService<R> {
    estimator: PriceEstimator,
    noise: Arc<dyn NoiseSource>,
    repository: Arc<R>,
    latency: LatencyProfile,
    notifier: Notifier,
}

static PREDICTION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_prediction_id() -> PredictionId {
    let id = PREDICTION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    PredictionId(format!("pred-{id:06}"))
}

impl<R> PredictionService<R>
where
    R: PredictionRepository + 'static,
{
    pub fn new(
        noise: Arc<dyn NoiseSource>,
        repository: Arc<R>,
        latency: LatencyProfile,
        notifier: Notifier,
    ) -> Self {
        let estimator = PriceEstimator::new(noise.clone());
        Self::with_estimator(estimator, noise, repository, latency, notifier)
    }

    pub fn with_estimator(
        estimator: PriceEstimator,
        noise: Arc<dyn NoiseSource>,
        repository: Arc<R>,
        latency: LatencyProfile,
        notifier: Notifier,
    ) -> Self {
        Self {
            estimator,
            noise,
            repository,
            latency,
            notifier,
        }
    }

    pub fn estimator(&self) -> &PriceEstimator {
        &self.estimator
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Validate a raw form, wait out the cosmetic delay and return a display-ready estimate.
    pub async fn predict(&self, form: &RawForm) -> Result<PredictionView, PredictionServiceError> {
        let attrs = match validate(form) {
            Ok(attrs) => attrs,
            Err(errors) => {
                warn!(fields = errors.len(), "prediction form rejected");
                return Err(errors.into());
            }
        };

        pause(self.prediction_delay()).await;

        let view = PredictionView::from_prediction(self.estimator.estimate(&attrs));
        info!(
            area = attrs.area,
            price = view.price,
            formatted = %view.formatted_price,
            "prediction served"
        );
        Ok(view)
    }

    pub async fn save(
        &self,
        prediction: PredictionView,
    ) -> Result<SaveAcknowledgement, PredictionServiceError> {
        pause(self.latency.save_delay).await;

        let saved = self.repository.insert(SavedPrediction {
            id: next_prediction_id(),
            prediction,
            saved_at: Utc::now(),
        })?;
        info!(id = %saved.id.0, "prediction saved to wishlist");

        Ok(SaveAcknowledgement {
            saved,
            notification: self.notifier.saved_to_wishlist(),
        })
    }

    pub fn saved(&self, limit: usize) -> Result<Vec<SavedPrediction>, PredictionServiceError> {
        Ok(self.repository.list(limit)?)
    }

    fn prediction_delay(&self) -> Duration {
        let jitter_ms = self.latency.jitter.as_secs_f64() * 1000.0;
        let extra = self.noise.sample(0.0, jitter_ms);
        self.latency.delay + Duration::from_secs_f64(extra.max(0.0) / 1000.0)
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Error raised by the prediction service.
#[derive(Debug, thiserror::Error)]
pub enum PredictionServiceError {
    #[error("invalid submission: {0}")]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
