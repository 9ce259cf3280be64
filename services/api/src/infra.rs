use house_pricing::config::PredictionConfig;
use house_pricing::prediction::{
    LatencyProfile, Notifier, PredictionRepository, PredictionService, RandomNoise,
    RepositoryError, SavedPrediction,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local wishlist; cleared on restart.
#[derive(Default, Clone)]
pub(crate) struct InMemoryPredictionRepository {
    records: Arc<Mutex<Vec<SavedPrediction>>>,
}

impl PredictionRepository for InMemoryPredictionRepository {
    fn insert(&self, saved: SavedPrediction) -> Result<SavedPrediction, RepositoryError> {
        let mut guard = self.records.lock().map_err(poisoned)?;
        if guard.iter().any(|existing| existing.id == saved.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(saved.clone());
        Ok(saved)
    }

    fn list(&self, limit: usize) -> Result<Vec<SavedPrediction>, RepositoryError> {
        let guard = self.records.lock().map_err(poisoned)?;
        Ok(guard.iter().rev().take(limit).cloned().collect())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> RepositoryError {
    RepositoryError::Unavailable("wishlist lock poisoned".to_string())
}

pub(crate) fn build_prediction_service(
    config: &PredictionConfig,
) -> PredictionService<InMemoryPredictionRepository> {
    PredictionService::new(
        Arc::new(RandomNoise::from_seed_option(config.random_seed)),
        Arc::new(InMemoryPredictionRepository::default()),
        LatencyProfile::from(config),
        Notifier::new(config.notification_ttl),
    )
}
