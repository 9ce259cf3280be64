use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::PredictionView;

/// Identifier wrapper for wishlist entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PredictionId(pub String);

/// Estimate the user chose to keep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPrediction {
    pub id: PredictionId,
    pub prediction: PredictionView,
    pub saved_at: DateTime<Utc>,
}

/// Wishlist storage so the service can be exercised with any backend.
pub trait PredictionRepository: Send + Sync {
    fn insert(&self, saved: SavedPrediction) -> Result<SavedPrediction, RepositoryError>;
    /// Most recent first, at most `limit` entries.
    fn list(&self, limit: usize) -> Result<Vec<SavedPrediction>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("prediction already saved")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
