use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::prediction::repository::{PredictionRepository, RepositoryError, SavedPrediction};
use crate::prediction::{FixedNoise, LatencyProfile, Notifier, PredictionService, RawForm};

pub(super) fn complete_form() -> RawForm {
    [
        ("area", "7420"),
        ("bedrooms", "4"),
        ("bathrooms", "2"),
        ("stories", "3"),
        ("mainroad", "yes"),
        ("guestroom", "no"),
        ("basement", "no"),
        ("hotwaterheating", "no"),
        ("airconditioning", "yes"),
        ("parking", "2"),
        ("prefarea", "yes"),
        ("furnishingstatus", "furnished"),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value.to_string()))
    .collect()
}

/// Pre-noise total of [`complete_form`]: 7420 sq ft at 825/sq ft plus counts and furnishing.
pub(super) const COMPLETE_FORM_TOTAL: u64 =
    7420 * 825 + 300_000 + 150_000 + 400_000 + 200_000 + 500_000;

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) saved: Arc<Mutex<Vec<SavedPrediction>>>,
}

impl PredictionRepository for MemoryRepository {
    fn insert(&self, saved: SavedPrediction) -> Result<SavedPrediction, RepositoryError> {
        let mut guard = self.saved.lock().expect("repository mutex poisoned");
        if guard.iter().any(|existing| existing.id == saved.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(saved.clone());
        Ok(saved)
    }

    fn list(&self, limit: usize) -> Result<Vec<SavedPrediction>, RepositoryError> {
        let guard = self.saved.lock().expect("repository mutex poisoned");
        Ok(guard.iter().rev().take(limit).cloned().collect())
    }
}

pub(super) struct UnavailableRepository;

impl PredictionRepository for UnavailableRepository {
    fn insert(&self, _saved: SavedPrediction) -> Result<SavedPrediction, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn list(&self, _limit: usize) -> Result<Vec<SavedPrediction>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }
}

pub(super) fn build_service() -> (Arc<PredictionService<MemoryRepository>>, MemoryRepository) {
    let repository = MemoryRepository::default();
    let service = PredictionService::new(
        Arc::new(FixedNoise::low()),
        Arc::new(repository.clone()),
        LatencyProfile::immediate(),
        Notifier::default(),
    );
    (Arc::new(service), repository)
}

pub(super) fn unavailable_service() -> Arc<PredictionService<UnavailableRepository>> {
    Arc::new(PredictionService::new(
        Arc::new(FixedNoise::low()),
        Arc::new(UnavailableRepository),
        LatencyProfile::immediate(),
        Notifier::default(),
    ))
}

pub(super) async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}
